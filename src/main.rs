use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medsentry::api::start_server;
use medsentry::config::{self, Settings};
use medsentry::core_state::CoreState;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        port = settings.port,
        scrape_configured = settings.scrape.is_some(),
        "starting medsentry"
    );
    if settings.scrape.is_none() {
        tracing::warn!("scrape source unconfigured; interaction checks use the terminology API only");
    }

    let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), settings.port);
    let core = Arc::new(CoreState::new(settings));
    let mut server = start_server(core, addr).await?;
    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    server.shutdown();

    Ok(())
}
