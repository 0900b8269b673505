//! Entry point: load config, connect the user service, and run the server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use user_api::config::Config;
use user_api::{build_state, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "unable to start the server");
            return Err(e.into());
        }
    };

    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "API listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
