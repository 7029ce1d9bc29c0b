//! Open assistant sessions keyed by a server-issued id.
//!
//! Each session owns its transcript exclusively. A session that receives an
//! end phrase is removed by a timer task after the configured auto-close
//! delay; closing or rebinding it earlier aborts that task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use handoff_assistant::{ConversationSession, SessionState, SubmitOutcome};
use handoff_core::{AssistantConfig, ChatMessage, PatientRecord};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

struct SessionEntry {
    session: ConversationSession,
    close_timer: Option<JoinHandle<()>>,
}

impl SessionEntry {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.close_timer.take() {
            timer.abort();
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("session {id} not found"))
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `patient` and return its id with the seeded
    /// transcript (welcome plus any bind-time alerts).
    pub async fn open(
        &self,
        patient: PatientRecord,
        config: AssistantConfig,
    ) -> Result<(String, Vec<ChatMessage>), ApiError> {
        let session = ConversationSession::open(patient, config)?;
        let id = Uuid::new_v4().to_string();
        let messages = session.messages().to_vec();

        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            id.clone(),
            SessionEntry {
                session,
                close_timer: None,
            },
        );
        info!(session_id = %id, live = sessions.len(), "session registered");
        Ok((id, messages))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// An open session already bound to `patient_id`. Sessions that are
    /// closing are never handed out again.
    pub async fn open_for_patient(&self, patient_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().await;
        sessions
            .iter()
            .filter(|(_, entry)| {
                entry.session.patient().id == patient_id
                    && entry.session.state() == SessionState::Open
            })
            .map(|(id, _)| id)
            .min()
            .cloned()
    }

    pub async fn submit(
        &self,
        id: &str,
        patient: &PatientRecord,
        text: &str,
    ) -> Result<SubmitOutcome, ApiError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

        let outcome = entry.session.submit(patient, text)?;
        if matches!(outcome, SubmitOutcome::Closing(_)) {
            let delay = entry.session.config().auto_close_delay();
            entry.cancel_timer();
            entry.close_timer = Some(self.schedule_close(id.to_string(), delay));
        }
        Ok(outcome)
    }

    fn schedule_close(&self, id: String, delay: Duration) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(mut entry) = sessions.lock().await.remove(&id) {
                entry.session.close();
                info!(session_id = %id, "session auto-closed");
            }
        })
    }

    pub async fn messages(&self, id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let sessions = self.sessions.lock().await;
        let entry = sessions.get(id).ok_or_else(|| not_found(id))?;
        Ok(entry.session.messages().to_vec())
    }

    /// Close and forget a session, cancelling any pending auto-close.
    pub async fn close(&self, id: &str) -> Result<(), ApiError> {
        let mut entry = self
            .sessions
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| not_found(id))?;
        entry.cancel_timer();
        entry.session.close();
        Ok(())
    }

    /// Bind a session to another patient. A pending auto-close is
    /// cancelled since the session starts over.
    pub async fn rebind(
        &self,
        id: &str,
        patient: PatientRecord,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

        if entry.session.rebind(patient)? {
            entry.cancel_timer();
        }
        Ok(entry.session.messages().to_vec())
    }

    /// Run the alert monitor of every session bound to this patient.
    /// Returns the distinct alerts raised, in first-seen order.
    pub async fn vitals_changed(&self, patient: &PatientRecord) -> Result<Vec<String>, ApiError> {
        let mut sessions = self.sessions.lock().await;
        let mut alerts: Vec<String> = Vec::new();

        for entry in sessions.values_mut() {
            if entry.session.patient().id != patient.id {
                continue;
            }
            for alert in entry.session.on_vitals_changed(patient)? {
                if !alerts.contains(&alert) {
                    alerts.push(alert);
                }
            }
        }
        Ok(alerts)
    }
}
