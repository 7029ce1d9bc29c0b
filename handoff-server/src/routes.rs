use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use handoff_assistant::SubmitOutcome;
use handoff_core::{ChatMessage, VitalsSnapshot};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionReq {
    pub patient_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRes {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReq {
    pub patient_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRes {
    pub session_id: String,
    pub reply: String,
    pub timestamp: DateTime<Utc>,
    /// The session will close after the auto-close delay.
    pub closing: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VitalsRes {
    pub alerts: Vec<String>,
}

/// `GET /health`
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Handoff assistant is alive".into(),
    })
}

/// `POST /assistant/sessions`
pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionReq>,
) -> Result<(StatusCode, Json<OpenSessionRes>), ApiError> {
    let patient = state.repository.get(&req.patient_id)?;
    let (session_id, messages) = state.sessions.open(patient, state.config.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(OpenSessionRes {
            session_id,
            messages,
        }),
    ))
}

/// `POST /assistant/message`. Without a live `sessionId` the patient's open
/// session is reused, or a new one is opened.
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<MessageReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("message text is empty".into()));
    }

    let patient = state.repository.get(&req.patient_id)?;
    let known = match &req.session_id {
        Some(id) => state.sessions.contains(id).await,
        None => false,
    };
    let reusable = match req.session_id {
        Some(id) if known => Some(id),
        _ => state.sessions.open_for_patient(&patient.id).await,
    };
    let session_id = match reusable {
        Some(id) => id,
        None => {
            let (id, _) = state
                .sessions
                .open(patient.clone(), state.config.clone())
                .await?;
            id
        }
    };

    tokio::time::sleep(state.config.response_delay()).await;

    let (message, closing) = match state.sessions.submit(&session_id, &patient, text).await? {
        SubmitOutcome::Replied(message) => (message, false),
        SubmitOutcome::Closing(message) => (message, true),
        SubmitOutcome::Ignored => {
            return Err(ApiError::Conflict(format!(
                "session {session_id} no longer accepts messages"
            )))
        }
    };

    Ok(Json(MessageRes {
        session_id,
        reply: message.content,
        timestamp: message.timestamp,
        closing,
    }))
}

/// `GET /assistant/sessions/:id/messages`
pub async fn session_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(state.sessions.messages(&id).await?))
}

/// `DELETE /assistant/sessions/:id`
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.close(&id).await?;
    info!(session_id = %id, "session closed by client");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /assistant/sessions/:id/rebind`
pub async fn rebind_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OpenSessionReq>,
) -> Result<Json<OpenSessionRes>, ApiError> {
    let patient = state.repository.get(&req.patient_id)?;
    let messages = state.sessions.rebind(&id, patient).await?;
    Ok(Json(OpenSessionRes {
        session_id: id,
        messages,
    }))
}

/// `PUT /patients/:id/vitals`
pub async fn update_vitals(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(vitals): Json<VitalsSnapshot>,
) -> Result<Json<VitalsRes>, ApiError> {
    let patient = state.repository.update_vitals(&id, vitals)?;
    let alerts = state.sessions.vitals_changed(&patient).await?;
    Ok(Json(VitalsRes { alerts }))
}
