//! One open assistant dialog bound to one patient.

use handoff_core::{AssistantConfig, AssistantError, ChatMessage, ChatRole, PatientRecord};
use serde::Serialize;
use tracing::info;

use crate::alerts::AlertMonitor;
use crate::classify::Topic;
use crate::render::FAREWELL;
use crate::welcome::welcome_message;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Open,
    /// Farewell sent; the owner closes the session after
    /// `AssistantConfig::auto_close_delay`.
    Closing,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank text, or the session no longer accepts messages.
    Ignored,
    Replied(ChatMessage),
    /// An end phrase was received; carries the farewell message.
    Closing(ChatMessage),
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    patient: PatientRecord,
    config: AssistantConfig,
    messages: Vec<ChatMessage>,
    state: SessionState,
    monitor: AlertMonitor,
    next_id: u64,
}

impl ConversationSession {
    /// Open a session: welcome message first, then any alerts for the
    /// vitals at bind time.
    pub fn open(patient: PatientRecord, config: AssistantConfig) -> Result<Self, AssistantError> {
        patient.validate()?;

        let mut session = Self {
            patient,
            config,
            messages: Vec::new(),
            state: SessionState::Open,
            monitor: AlertMonitor::new(),
            next_id: 1,
        };
        session.seed();

        info!(patient_id = %session.patient.id, "assistant session opened");
        Ok(session)
    }

    fn seed(&mut self) {
        let welcome = welcome_message(&self.patient);
        self.push(ChatRole::Assistant, welcome);
        for alert in self.monitor.on_vitals_changed(&self.patient) {
            self.push(ChatRole::Assistant, alert);
        }
    }

    fn push(&mut self, role: ChatRole, content: String) -> ChatMessage {
        let message = ChatMessage::new(self.next_id.to_string(), role, content);
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    fn ensure_bound(&self, patient: &PatientRecord) -> Result<(), AssistantError> {
        if patient.id == self.patient.id {
            Ok(())
        } else {
            Err(AssistantError::PatientMismatch {
                expected: self.patient.id.clone(),
                actual: patient.id.clone(),
            })
        }
    }

    /// Answer one nurse message against the latest record for the bound
    /// patient.
    pub fn submit(
        &mut self,
        patient: &PatientRecord,
        text: &str,
    ) -> Result<SubmitOutcome, AssistantError> {
        self.ensure_bound(patient)?;

        let text = text.trim();
        if text.is_empty() || self.state != SessionState::Open {
            return Ok(SubmitOutcome::Ignored);
        }

        patient.validate()?;
        self.patient = patient.clone();
        self.push(ChatRole::User, text.to_string());

        let reply = crate::route(text, &self.patient);
        if reply.intent == crate::Intent::Topic(Topic::EndConversation) {
            let farewell = self.push(ChatRole::Assistant, FAREWELL.to_string());
            self.state = SessionState::Closing;
            info!(
                patient_id = %self.patient.id,
                delay_ms = self.config.auto_close_delay_ms,
                "end phrase received, session closing"
            );
            return Ok(SubmitOutcome::Closing(farewell));
        }

        Ok(SubmitOutcome::Replied(
            self.push(ChatRole::Assistant, reply.text),
        ))
    }

    /// Re-run the alert monitor for an updated record. New alerts are
    /// appended to the transcript and returned for banner display.
    pub fn on_vitals_changed(
        &mut self,
        patient: &PatientRecord,
    ) -> Result<Vec<String>, AssistantError> {
        self.ensure_bound(patient)?;
        if self.state == SessionState::Closed {
            return Ok(Vec::new());
        }

        patient.validate()?;
        self.patient = patient.clone();
        let alerts = self.monitor.on_vitals_changed(&self.patient);
        for alert in &alerts {
            self.push(ChatRole::Assistant, alert.clone());
        }
        Ok(alerts)
    }

    /// Bind a different patient, discarding the transcript. Returns
    /// `false` when the patient is already bound.
    pub fn rebind(&mut self, patient: PatientRecord) -> Result<bool, AssistantError> {
        if patient.id == self.patient.id {
            return Ok(false);
        }
        patient.validate()?;

        info!(
            from = %self.patient.id,
            to = %patient.id,
            "assistant session rebound"
        );
        self.patient = patient;
        self.messages.clear();
        self.next_id = 1;
        self.state = SessionState::Open;
        self.monitor.reset();
        self.seed();
        Ok(true)
    }

    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Closed;
            info!(patient_id = %self.patient.id, "assistant session closed");
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn patient(&self) -> &PatientRecord {
        &self.patient
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handoff_core::{AcuityLevel, Demographics, RiskLevel, VitalsSnapshot};

    fn patient(id: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            name: "James Wilson".into(),
            room: "CCU-3".into(),
            primary_diagnosis: "Heart failure exacerbation".into(),
            risk_level: RiskLevel::High,
            acuity_level: AcuityLevel::new(4).unwrap(),
            allergies: vec![],
            vitals: VitalsSnapshot::default(),
            medications: vec![],
            demographics: Demographics::default(),
            pain: None,
        }
    }

    #[test]
    fn message_ids_follow_transcript_order() {
        let record = patient("p-1");
        let mut session = ConversationSession::open(record.clone(), AssistantConfig::default())
            .unwrap();
        session.submit(&record, "What is the room?").unwrap();

        let ids: Vec<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn closed_sessions_ignore_input_and_alerts() {
        let mut record = patient("p-1");
        let mut session = ConversationSession::open(record.clone(), AssistantConfig::default())
            .unwrap();
        session.close();

        assert_eq!(
            session.submit(&record, "pain?").unwrap(),
            SubmitOutcome::Ignored
        );
        record.vitals.pain_level = Some(9);
        assert!(session.on_vitals_changed(&record).unwrap().is_empty());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn rebind_same_patient_is_a_no_op() {
        let record = patient("p-1");
        let mut session = ConversationSession::open(record.clone(), AssistantConfig::default())
            .unwrap();
        session.submit(&record, "name?").unwrap();
        assert!(!session.rebind(record).unwrap());
        assert_eq!(session.messages().len(), 3);
    }
}
