//! Shared fixtures for handler tests

use crate::config::{
    AppState, Config, DatabaseConfig, HttpConfig, LoggingConfig, PathsConfig, PerformanceConfig,
    ServerConfig,
};
use crate::http::AccessSink;
use crate::logger::AccessLogEntry;
use crate::store::{students, Store};
use crate::templates::Templates;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::Response;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn manifest_dir(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(name)
        .to_string_lossy()
        .into_owned()
}

pub fn config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        http: HttpConfig {
            max_body_size: 1_048_576,
        },
        performance: PerformanceConfig {
            keep_alive: true,
            max_connections: None,
        },
        paths: PathsConfig {
            public_dir: manifest_dir("public"),
            templates_dir: manifest_dir("templates"),
        },
        database: DatabaseConfig {
            path: ":memory:".to_string(),
            seed: true,
        },
    }
}

async fn seeded_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    students::init_schema(&store).await.unwrap();
    students::seed_if_empty(&store).await.unwrap();
    store
}

async fn build(sink: AccessSink) -> AppState {
    let config = config();
    let templates = Templates::from_dir(&config.paths.templates_dir);
    AppState::with_sink(config, seeded_store().await, templates, sink).unwrap()
}

/// Seeded in-memory state with access logging discarded
pub async fn state() -> AppState {
    build(Arc::new(|_: &AccessLogEntry| {})).await
}

/// Seeded state whose access log entries are collected
pub async fn state_with_recorder() -> (AppState, Arc<Mutex<Vec<AccessLogEntry>>>) {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&entries);
    let sink: AccessSink = Arc::new(move |entry: &AccessLogEntry| {
        captured.lock().unwrap().push(entry.clone());
    });
    (build(sink).await, entries)
}

pub async fn body_string<B>(response: Response<B>) -> String
where
    B: Body,
    B::Error: std::fmt::Debug,
{
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
