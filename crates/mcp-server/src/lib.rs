//! # mcp-server
//!
//! Axum gateway exposing one domain's tools over HTTP:
//!
//! ```text
//! GET  /health                 GET  /mcp/resources      GET /mcp/tools
//! POST /mcp/execute            POST /api/openai/chat
//! dogs:   /api/dogs/*          POST /api/openai/generate-{description,care-tips}
//! sheets: /api/smartsheet/*
//! everything else: static files when `STATIC_DIR` is set
//! ```

pub mod config;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use config::{Domain, ServerConfig};
pub use state::AppState;

use crate::handlers::{
    breed_images, chat, dog_breeds, execute_tool, generate_care_tips, generate_description,
    get_sheet, health_check, list_resources, list_sheets, list_tools, random_dog,
};

/// Build the gateway router for `state`, serving `static_dir` as fallback
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        // Health & MCP
        .route("/health", get(health_check))
        .route("/mcp/resources", get(list_resources))
        .route("/mcp/tools", get(list_tools))
        .route("/mcp/execute", post(execute_tool))
        .route("/api/openai/chat", post(chat));

    if state.dogs.is_some() {
        app = app
            .route("/api/dogs/random", get(random_dog))
            .route("/api/dogs/breeds", get(dog_breeds))
            .route("/api/dogs/breeds/{breedId}/images", get(breed_images))
            .route("/api/openai/generate-description", post(generate_description))
            .route("/api/openai/generate-care-tips", post(generate_care_tips));
    }

    if state.sheets.is_some() {
        app = app
            .route("/api/smartsheet/sheets", get(list_sheets))
            .route("/api/smartsheet/sheets/{sheetId}", get(get_sheet));
    }

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
