//! Web server for the diagram review pages.
//!
//! Three pages mirror the user's flow:
//! - a landing page describing the analysis methods
//! - an upload form taking the diagram and the chosen method
//! - a results page that runs (or reuses) the analysis for the session

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use handlers::SESSION_COOKIE;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::Pipeline;
use crate::config::Settings;
use crate::llm::OllamaClient;
use crate::ocr::TesseractBackend;
use crate::session::SessionStore;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub sessions: Arc<SessionStore>,
    /// Request body limit applied to uploads.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, max_upload_bytes: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(SessionStore::new()),
            max_upload_bytes,
        }
    }

    /// Build the state with the Ollama client and Tesseract backend.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = OllamaClient::new(settings.llm.clone())?;
        let ocr = TesseractBackend::with_config(settings.ocr.clone());
        let pipeline = Pipeline::new(
            Arc::new(client),
            Arc::new(ocr),
            settings.llm.ocr_num_ctx,
        )
        .with_ocr_timeout(settings.ocr.timeout());
        Ok(Self::new(pipeline, settings.max_upload_bytes))
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
