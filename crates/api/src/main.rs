use anyhow::Result;
use careermate_api::{build_app, ApiConfig};
use careermate_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("careermate_api");

    let config = ApiConfig::from_env();
    let bind = config.bind.clone();
    let speech_enabled = config.openai_api_key.is_some();
    let persistent = config.database_url.is_some();

    let app = build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(
        bind = %bind,
        speech_enabled,
        persistent,
        "careermate api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
