use std::net::SocketAddr;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;
mod store;
mod templates;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;
    // Host names are looked up here, before any runtime worker exists
    let addr = cfg.get_socket_addr()?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg, addr))
}

async fn async_main(
    cfg: config::Config,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = store::Store::open(&cfg.database.path)?;
    store::students::init_schema(&store).await?;
    if cfg.database.seed {
        let seeded = store::students::seed_if_empty(&store).await?;
        if seeded > 0 {
            logger::log_info(&format!("Seeded {seeded} sample students"));
        }
    }

    let templates = templates::Templates::from_dir(&cfg.paths.templates_dir);
    let state = Arc::new(config::AppState::new(cfg, store, templates)?);

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &state.config, state.routes.iter().count());

    server::run_until(listener, state, server::shutdown_signal()).await;
    Ok(())
}
