//! Keyword entity extraction over a message, using the patient's own
//! medication and allergy lists as part of the vocabulary.

use handoff_core::PatientRecord;
use serde::Serialize;

use crate::classify::tokenize;

/// Vital sign terms a nurse may ask about, including those the evaluator
/// does not grade (weight, height).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalTerm {
    Temperature,
    BloodPressure,
    HeartRate,
    OxygenSaturation,
    RespiratoryRate,
    Weight,
    Height,
    Pain,
}

const VITAL_VOCABULARY: [(&str, VitalTerm); 15] = [
    ("temperature", VitalTerm::Temperature),
    ("temp", VitalTerm::Temperature),
    ("blood pressure", VitalTerm::BloodPressure),
    ("bp", VitalTerm::BloodPressure),
    ("heart rate", VitalTerm::HeartRate),
    ("pulse", VitalTerm::HeartRate),
    ("oxygen", VitalTerm::OxygenSaturation),
    ("spo2", VitalTerm::OxygenSaturation),
    ("saturation", VitalTerm::OxygenSaturation),
    ("pain", VitalTerm::Pain),
    ("respiratory rate", VitalTerm::RespiratoryRate),
    ("resp rate", VitalTerm::RespiratoryRate),
    ("rr", VitalTerm::RespiratoryRate),
    ("weight", VitalTerm::Weight),
    ("height", VitalTerm::Height),
];

const SYMPTOM_VOCABULARY: [&str; 7] = [
    "fever",
    "cough",
    "nausea",
    "vomiting",
    "diarrhea",
    "fatigue",
    "dizziness",
];

const LAB_VOCABULARY: [&str; 6] = [
    "wbc",
    "white blood cell",
    "hemoglobin",
    "creatinine",
    "potassium",
    "sodium",
];

const DIAGNOSIS_VOCABULARY: [&str; 5] =
    ["diabetes", "hypertension", "infection", "sepsis", "stroke"];

const PROCEDURE_VOCABULARY: [&str; 5] = ["iv", "catheter", "surgery", "intubation", "dialysis"];

/// Matches grouped by category. Each list keeps vocabulary order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EntityMatches {
    /// Distinct vitals, first mention of each.
    pub vitals: Vec<VitalTerm>,
    pub symptoms: Vec<String>,
    pub labs: Vec<String>,
    pub diagnoses: Vec<String>,
    pub procedures: Vec<String>,
    /// Medication names as recorded on the patient.
    pub medications: Vec<String>,
    /// Allergy names as recorded on the patient.
    pub allergies: Vec<String>,
}

/// The single category that answers the message, by precedence
/// vitals > symptoms > labs > diagnoses > procedures > medications > allergies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityFocus<'a> {
    Vitals(&'a [VitalTerm]),
    Symptoms(&'a [String]),
    Labs(&'a [String]),
    Diagnoses(&'a [String]),
    Procedures(&'a [String]),
    Medications(&'a [String]),
    Allergies(&'a [String]),
}

impl EntityMatches {
    pub fn focus(&self) -> Option<EntityFocus<'_>> {
        if !self.vitals.is_empty() {
            Some(EntityFocus::Vitals(&self.vitals))
        } else if !self.symptoms.is_empty() {
            Some(EntityFocus::Symptoms(&self.symptoms))
        } else if !self.labs.is_empty() {
            Some(EntityFocus::Labs(&self.labs))
        } else if !self.diagnoses.is_empty() {
            Some(EntityFocus::Diagnoses(&self.diagnoses))
        } else if !self.procedures.is_empty() {
            Some(EntityFocus::Procedures(&self.procedures))
        } else if !self.medications.is_empty() {
            Some(EntityFocus::Medications(&self.medications))
        } else if !self.allergies.is_empty() {
            Some(EntityFocus::Allergies(&self.allergies))
        } else {
            None
        }
    }
}

/// Prepared message text: lower-cased tokens plus a space-joined form for
/// multi-word phrases.
struct MessageText {
    tokens: Vec<String>,
    joined: String,
}

impl MessageText {
    fn new(message: &str) -> Self {
        let tokens = tokenize(message);
        let joined = format!(" {} ", tokens.join(" "));
        Self { tokens, joined }
    }

    /// Single words match a token; phrases match on word boundaries.
    fn mentions(&self, term: &str) -> bool {
        let term_tokens = tokenize(term);
        match term_tokens.as_slice() {
            [] => false,
            [word] => self.tokens.iter().any(|token| token == word),
            phrase => self.joined.contains(&format!(" {} ", phrase.join(" "))),
        }
    }
}

pub fn extract(message: &str, patient: &PatientRecord) -> EntityMatches {
    let text = MessageText::new(message);

    let mut vitals = Vec::new();
    for (term, vital) in VITAL_VOCABULARY {
        if text.mentions(term) && !vitals.contains(&vital) {
            vitals.push(vital);
        }
    }

    EntityMatches {
        vitals,
        symptoms: vocabulary_matches(&text, &SYMPTOM_VOCABULARY),
        labs: vocabulary_matches(&text, &LAB_VOCABULARY),
        diagnoses: vocabulary_matches(&text, &DIAGNOSIS_VOCABULARY),
        procedures: vocabulary_matches(&text, &PROCEDURE_VOCABULARY),
        medications: record_matches(&text, patient.medications.iter().map(|med| &med.name)),
        allergies: record_matches(&text, patient.allergies.iter()),
    }
}

fn vocabulary_matches(text: &MessageText, vocabulary: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|term| text.mentions(term))
        .map(|term| term.to_string())
        .collect()
}

fn record_matches<'a>(text: &MessageText, names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for name in names {
        if text.mentions(name) && !found.iter().any(|f| f.eq_ignore_ascii_case(name)) {
            found.push(name.clone());
        }
    }
    found
}
