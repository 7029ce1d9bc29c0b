//! Patient record model shared by the handoff assistant crates.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod repository;

pub use repository::{InMemoryPatientRepository, PatientRepository};

/// Timing knobs for the assistant boundary (UI, server, CLI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    /// Simulated "thinking" pause before a reply is released (milliseconds).
    pub response_delay_ms: u64,
    /// Delay between the farewell message and the dialog closing (milliseconds).
    pub auto_close_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: 1_000,
            auto_close_delay_ms: 3_000,
        }
    }
}

impl AssistantConfig {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }
}

/// Clinical risk category assigned by the care team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn is_critical(self) -> bool {
        self == RiskLevel::Critical
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nursing acuity on a 1 (stable) to 5 (most intensive) scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct AcuityLevel(u8);

impl AcuityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, AssistantError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(AssistantError::InvalidPatient(format!(
                "acuity level must be between {} and {}, received {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Acuity 4 and 5 call for frequent reassessment.
    pub fn is_high(self) -> bool {
        self.0 >= 4
    }
}

impl TryFrom<u8> for AcuityLevel {
    type Error = AssistantError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AcuityLevel> for u8 {
    fn from(level: AcuityLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AcuityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Latest recorded vital signs. Every field is optional: absent means
/// "not yet measured", never zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshot {
    /// Degrees Fahrenheit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    /// Beats per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,
    /// Breaths per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<u16>,
    /// Percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,
    /// 0 to 10 numeric rating scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<u8>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl VitalsSnapshot {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Active,
    Given,
    Held,
    Discontinued,
}

/// One entry of the medication administration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub frequency: String,
    pub status: MedicationStatus,
    #[serde(default)]
    pub indication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_given: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
}

/// Free-text pain characterisation charted alongside the numeric score.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PainDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggravating_factors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relieving_factors: Option<String>,
}

/// Read-only patient view handed to the assistant by the patient store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub room: String,
    pub primary_diagnosis: String,
    pub risk_level: RiskLevel,
    pub acuity_level: AcuityLevel,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub vitals: VitalsSnapshot,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain: Option<PainDescriptor>,
}

impl PatientRecord {
    /// Check the caller contract: identity fields present, scores in range.
    pub fn validate(&self) -> Result<(), AssistantError> {
        for (field, value) in [("id", &self.id), ("name", &self.name), ("room", &self.room)] {
            if value.trim().is_empty() {
                return Err(AssistantError::InvalidPatient(format!(
                    "required field `{field}` is empty"
                )));
            }
        }

        if let Some(pain) = self.vitals.pain_level {
            if pain > 10 {
                return Err(AssistantError::InvalidPatient(format!(
                    "pain level must be between 0 and 10, received {pain}"
                )));
            }
        }

        Ok(())
    }

    pub fn medications_with_status(
        &self,
        status: MedicationStatus,
    ) -> impl Iterator<Item = &Medication> {
        self.medications
            .iter()
            .filter(move |med| med.status == status)
    }

    pub fn active_medication_count(&self) -> usize {
        self.medications_with_status(MedicationStatus::Active).count()
    }

    pub fn has_allergies(&self) -> bool {
        !self.allergies.is_empty()
    }

    pub fn allergy_list(&self) -> String {
        self.allergies.join(", ")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry. Transcripts are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Errors raised for caller contract violations. Clinical "no data"
/// conditions are never errors.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("invalid patient record: {0}")]
    InvalidPatient(String),
    #[error("could not read patient data: {0}")]
    Parse(String),
    #[error("patient {0} not found")]
    PatientNotFound(String),
    #[error("session is bound to patient {expected}, received {actual}")]
    PatientMismatch { expected: String, actual: String },
    #[error("patient repository failure: {0}")]
    Repository(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acuity_rejects_out_of_range_values() {
        assert!(AcuityLevel::new(0).is_err());
        assert!(AcuityLevel::new(6).is_err());
        assert_eq!(AcuityLevel::new(4).map(AcuityLevel::value).ok(), Some(4));
    }

    #[test]
    fn acuity_deserialization_is_checked() {
        assert!(serde_json::from_str::<AcuityLevel>("3").is_ok());
        assert!(serde_json::from_str::<AcuityLevel>("9").is_err());
    }

    #[test]
    fn empty_vitals_snapshot_reports_empty() {
        assert!(VitalsSnapshot::default().is_empty());
        let vitals = VitalsSnapshot {
            pain_level: Some(0),
            ..VitalsSnapshot::default()
        };
        assert!(!vitals.is_empty());
    }

    #[test]
    fn validate_rejects_missing_identity_and_bad_pain() {
        let mut patient = PatientRecord {
            id: "p-1".into(),
            name: "Sarah Johnson".into(),
            room: "ICU-101".into(),
            primary_diagnosis: "Post-operative cardiac surgery".into(),
            risk_level: RiskLevel::Critical,
            acuity_level: AcuityLevel(5),
            allergies: vec![],
            vitals: VitalsSnapshot::default(),
            medications: vec![],
            demographics: Demographics::default(),
            pain: None,
        };
        assert!(patient.validate().is_ok());

        patient.vitals.pain_level = Some(11);
        assert!(matches!(
            patient.validate(),
            Err(AssistantError::InvalidPatient(_))
        ));

        patient.vitals.pain_level = Some(3);
        patient.room = "  ".into();
        assert!(patient.validate().is_err());
    }
}
