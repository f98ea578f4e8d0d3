//! Twingate tray entry point.

mod app;
mod config;
mod frontend;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the text front-end.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting gatetray");

    let config = config::Config::load()?;
    tracing::info!(
        client = %config.client_binary,
        notifier = %config.notifier_binary,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config))?;

    tracing::info!("gatetray shut down cleanly");
    Ok(())
}
