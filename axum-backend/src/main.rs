use dreamspace_backend::{create_app, AppState, ServerConfig};
use gemini_designer::GeminiDesigner;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[dreamspace-backend] .env not loaded: {} (using system environment)", e);
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting DreamSpace Backend Server");

    let config = ServerConfig::from_env()?;
    if config.allowed_origins.is_empty() {
        warn!("ALLOWED_ORIGINS is empty, accepting requests from any origin");
    }
    info!(
        "Using Gemini models {} (text) and {} (image)",
        config.gemini.text_model, config.gemini.image_model
    );

    let state = AppState::new(GeminiDesigner::new(config.gemini.clone()));
    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
