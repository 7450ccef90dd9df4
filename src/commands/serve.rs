use crate::libs::config::Config;
use crate::server::{self, AppState};
use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind, overrides the configured host")]
    host: Option<String>,
    #[arg(long, help = "Port to listen on, overrides the configured port")]
    port: Option<u16>,
}

#[tokio::main]
pub async fn cmd(args: ServeArgs) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::read()?;
    let server_config = config.server.clone().unwrap_or_default();
    let host = args.host.unwrap_or(server_config.host);
    let port = args.port.unwrap_or(server_config.port);

    let app = server::router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("dayboard listening on http://{}:{}", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}
