use anyhow::Context;

use stockroom_infra::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    match config.log_format {
        LogFormat::Json => stockroom_observability::init(),
        LogFormat::Pretty => stockroom_observability::init_pretty(),
    }

    let directory = stockroom_api::app::services::build_directory(&config).await?;
    let app = stockroom_api::app::build_app(directory);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
