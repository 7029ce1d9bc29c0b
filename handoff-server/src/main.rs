use std::sync::Arc;

use anyhow::Context;
use handoff_assistant::parse_patients_str;
use handoff_core::InMemoryPatientRepository;
use handoff_server::{app, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("handoff_server=info".parse()?)
                .add_directive("handoff_assistant=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let patients = match &config.patients_file {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("could not read patients file {}", path.display()))?;
            parse_patients_str(&data)
                .with_context(|| format!("invalid patients file {}", path.display()))?
        }
        None => {
            tracing::warn!("HANDOFF_PATIENTS_FILE not set, starting with no patients");
            Vec::new()
        }
    };
    tracing::info!(count = patients.len(), "patients loaded");

    let repository = Arc::new(InMemoryPatientRepository::with_patients(patients)?);
    let state = AppState::new(repository, config.assistant.clone());

    tracing::info!("-- Starting handoff assistant API on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
