//! Rule-based clinical response engine for the handoff dashboard assistant.
//!
//! A nurse message is classified into a topic, checked for clinical
//! entities, and answered with deterministic guidance built from the
//! patient record. [`ConversationSession`] wraps this in a transcript with
//! welcome, farewell and proactive vitals alerts.

pub mod alerts;
pub mod classify;
pub mod extract;
pub mod record;
pub mod render;
pub mod session;
pub mod vitals;
pub mod welcome;

use handoff_core::PatientRecord;
use serde::Serialize;
use tracing::debug;

pub use alerts::{vitals_alerts, AlertMonitor};
pub use classify::{classify, is_end_phrase, PersonalField, Topic};
pub use extract::{extract, EntityFocus, EntityMatches, VitalTerm};
pub use record::{parse_patient_str, parse_patient_value, parse_patients_str};
pub use render::{render, FAREWELL};
pub use session::{ConversationSession, SessionState, SubmitOutcome};
pub use vitals::{evaluate, Finding, FindingStatus, PainTier, VitalSign};
pub use welcome::welcome_message;

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "topic")]
pub enum Intent {
    Topic(Topic),
    /// Answered from entities found in a message that matched no topic
    /// keyword (personal lookups and fallback).
    Entities,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Classify and answer one message. Entity matches only answer messages
/// the topic rules would send to a personal lookup or the fallback.
pub fn route(message: &str, patient: &PatientRecord) -> Reply {
    let topic = classify(message);
    debug!(?topic, patient_id = %patient.id, "message classified");

    if matches!(topic, Topic::PersonalLookup(_) | Topic::Fallback) {
        let matches = extract(message, patient);
        if let Some(text) = render::render_entities(&matches, patient) {
            debug!(?matches, "answered from entities");
            return Reply {
                intent: Intent::Entities,
                text,
            };
        }
    }

    Reply {
        intent: Intent::Topic(topic),
        text: render(topic, message, patient),
    }
}

/// Reply text for one message. Blank messages get no reply.
pub fn respond(message: &str, patient: &PatientRecord) -> Option<String> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    Some(route(message, patient).text)
}
