use std::sync::Arc;

use harbor::config::Config;
use harbor::router::Router;
use harbor::server::listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let router = Arc::new(Router::new(cfg.directory.clone()));
    tracing::info!(directory = %router.directory().display(), "Serving files");

    tokio::select! {
        res = listener::run(&cfg.listen_addr, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
