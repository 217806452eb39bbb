// Application state module
// Everything a request handler needs, built once at startup

use std::path::PathBuf;
use std::sync::Arc;

use super::types::Config;
use crate::handler::routes::{self, Action};
use crate::http::AccessSink;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteError, RouteTable};
use crate::store::Store;
use crate::templates::Templates;

/// Application state, shared read-only across connections
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable<Action>,
    pub store: Store,
    pub templates: Templates,
    /// Directory served under `/public/`
    pub public_root: PathBuf,
    pub access_sink: AccessSink,
}

impl AppState {
    /// Compile the route table and wire the access log to the logger
    pub fn new(config: Config, store: Store, templates: Templates) -> Result<Self, RouteError> {
        let access_sink = access_sink(&config);
        Self::with_sink(config, store, templates, access_sink)
    }

    /// Like [`AppState::new`] with a caller-supplied access sink
    pub fn with_sink(
        config: Config,
        store: Store,
        templates: Templates,
        access_sink: AccessSink,
    ) -> Result<Self, RouteError> {
        Ok(Self {
            routes: routes::route_table()?,
            public_root: PathBuf::from(&config.paths.public_dir),
            config,
            store,
            templates,
            access_sink,
        })
    }
}

fn access_sink(config: &Config) -> AccessSink {
    if !config.logging.access_log {
        return Arc::new(|_: &AccessLogEntry| {});
    }
    let format = config.logging.access_log_format.clone();
    Arc::new(move |entry: &AccessLogEntry| logger::log_access(entry, &format))
}
