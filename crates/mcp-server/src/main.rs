//! MCP gateway HTTP server
//!
//! Serves one domain (dogs or sheets, chosen by `MCP_DOMAIN`) over REST.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dog_advisor::TheDogApiClient;
use mcp_core::{CompletionProvider, ResourceProvider, ToolDispatch};
use mcp_runtime::OpenAiProvider;
use mcp_server::{AppState, Domain, ServerConfig, router};
use sheet_advisor::SmartsheetClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Completion provider is required
    let provider = OpenAiProvider::from_env().context("OPENAI_API_KEY must be set")?;
    let info = provider.info();
    tracing::info!(provider = %info.name, model = %info.model, "Completion provider configured");

    // Verify the completion endpoint
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to {}", info.name),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - chat and AI tools will fail", info.name);
            tracing::warn!("  Check OPENAI_API_KEY and OPENAI_BASE_URL");
        }
    }
    let provider: Arc<dyn CompletionProvider> = Arc::new(provider);

    // Domain data source
    let state = match config.domain {
        Domain::Dogs => {
            let api = TheDogApiClient::from_env()?;
            tracing::info!(authenticated = api.has_credentials(), "Using TheDogAPI");
            AppState::for_dogs(provider, Arc::new(api))?
        }
        Domain::Sheets => {
            let api = SmartsheetClient::from_env()?;
            tracing::info!(authenticated = api.has_credentials(), "Using Smartsheet");
            AppState::for_sheets(provider, Arc::new(api))?
        }
    };

    let tools = state.dispatcher.descriptors().await;
    tracing::info!("Registered {} tools:", tools.len());
    for tool in &tools {
        tracing::info!("  • {}", tool.name);
    }

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
    }
    let app = router(state, config.static_dir.as_deref());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("MCP gateway ({}) running on http://{}", config.domain, config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /mcp/resources   - Resource descriptors");
    tracing::info!("  GET  /mcp/tools       - Tool descriptors");
    tracing::info!("  POST /mcp/execute     - Invoke a tool");
    tracing::info!("  POST /api/openai/chat - Forward a transcript to the model");

    axum::serve(listener, app).await?;

    Ok(())
}
