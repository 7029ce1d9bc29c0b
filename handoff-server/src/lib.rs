//! HTTP surface for the handoff assistant.
//!
//! Patients live in an injected [`PatientRepository`]; each assistant
//! dialog is a [`ConversationSession`](handoff_assistant::ConversationSession)
//! held by the [`SessionRegistry`].

pub mod error;
pub mod routes;
pub mod sessions;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{delete, get, post, put};
use axum::Router;
use handoff_core::{AssistantConfig, PatientRepository};
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use sessions::SessionRegistry;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PatientRepository>,
    pub sessions: SessionRegistry,
    pub config: AssistantConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn PatientRepository>, config: AssistantConfig) -> Self {
        Self {
            repository,
            sessions: SessionRegistry::new(),
            config,
        }
    }
}

/// Server settings read from the environment.
///
/// - `HANDOFF_ADDR`: bind address (default `0.0.0.0:3000`)
/// - `HANDOFF_PATIENTS_FILE`: JSON array of patient records to seed
/// - `HANDOFF_RESPONSE_DELAY_MS`, `HANDOFF_AUTO_CLOSE_DELAY_MS`: override
///   the assistant timings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub patients_file: Option<PathBuf>,
    pub assistant: AssistantConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut assistant = AssistantConfig::default();
        if let Some(raw) = lookup("HANDOFF_RESPONSE_DELAY_MS") {
            assistant.response_delay_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("HANDOFF_RESPONSE_DELAY_MS is not a number: {raw}"))?;
        }
        if let Some(raw) = lookup("HANDOFF_AUTO_CLOSE_DELAY_MS") {
            assistant.auto_close_delay_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("HANDOFF_AUTO_CLOSE_DELAY_MS is not a number: {raw}"))?;
        }

        Ok(Self {
            addr: lookup("HANDOFF_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into()),
            patients_file: lookup("HANDOFF_PATIENTS_FILE").map(PathBuf::from),
            assistant,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/assistant/sessions", post(routes::open_session))
        .route("/assistant/message", post(routes::post_message))
        .route(
            "/assistant/sessions/:id/messages",
            get(routes::session_messages),
        )
        .route("/assistant/sessions/:id", delete(routes::close_session))
        .route(
            "/assistant/sessions/:id/rebind",
            post(routes::rebind_session),
        )
        .route("/patients/:id/vitals", put(routes::update_vitals))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn config_defaults_and_overrides() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.patients_file, None);
        assert_eq!(config.assistant, AssistantConfig::default());

        let vars = HashMap::from([
            ("HANDOFF_ADDR", "127.0.0.1:8088"),
            ("HANDOFF_PATIENTS_FILE", "patients.json"),
            ("HANDOFF_RESPONSE_DELAY_MS", "0"),
            ("HANDOFF_AUTO_CLOSE_DELAY_MS", " 250 "),
        ]);
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8088");
        assert_eq!(config.patients_file, Some(PathBuf::from("patients.json")));
        assert_eq!(config.assistant.response_delay_ms, 0);
        assert_eq!(config.assistant.auto_close_delay_ms, 250);
    }

    #[test]
    fn bad_delay_is_rejected() {
        let result = ServerConfig::from_lookup(|key| {
            (key == "HANDOFF_RESPONSE_DELAY_MS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
