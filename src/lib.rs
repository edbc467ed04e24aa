pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod parser;
pub mod server;
pub mod tasks;
pub mod theme;
pub mod transport;
pub mod views;

use std::sync::Arc;

use crate::config::Config;
use crate::controller::SessionController;
use crate::error::Result;
use crate::tasks::GeminiStudy;
use crate::theme::ThemeStore;
use crate::transport::{GeminiTransport, Transport};

/// Wire the Gemini transport, the study tasks and the theme store into a controller
pub fn build_controller(cfg: &Config) -> Result<SessionController> {
    let transport = Arc::new(GeminiTransport::new(&cfg.gemini)?);
    let study = GeminiStudy::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        cfg.gemini.model.clone(),
    );

    Ok(SessionController::new(Arc::new(study)).with_theme_store(ThemeStore::new(
        cfg.theme.path.clone(),
    )))
}
