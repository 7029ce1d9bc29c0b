//! Ordered keyword rules mapping a nurse message to a topic.
//!
//! The first matching rule wins. There is no scoring: a message that
//! mentions both "pain" and "discharge" is a pain question because the pain
//! rule is evaluated first.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static END_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(thank you|thanks|end|bye|close)\b").expect("valid regex")
});

const VITALS_KEYWORDS: [&str; 4] = ["vital", "assessment", "monitor", "temperature"];
const VITALS_WORDS: [&str; 1] = ["bp"];
const MEDICATION_KEYWORDS: [&str; 3] = ["medication", "med", "drug"];
const PAIN_KEYWORDS: [&str; 1] = ["pain"];
const CARE_PRIORITY_KEYWORDS: [&str; 6] = [
    "priority",
    "priorities",
    "intervention",
    "care plan",
    "concern",
    "important",
];
const DISCHARGE_KEYWORDS: [&str; 4] = ["discharge", "home", "ready", "planning"];
const ALLERGY_KEYWORDS: [&str; 3] = ["allerg", "safety", "precaution"];
const ASSESSMENT_KEYWORDS: [&str; 3] = ["assess", "exam", "check"];

/// Single demographic or record field answered verbatim.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    Name,
    Gender,
    Age,
    MaritalStatus,
    Room,
    Diagnosis,
    RiskLevel,
    Acuity,
}

/// Closed set of intents, listed in evaluation order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "topic", content = "field")]
pub enum Topic {
    EndConversation,
    Vitals,
    Medication,
    Pain,
    CarePriorities,
    Discharge,
    Allergy,
    Assessment,
    PersonalLookup(PersonalField),
    Fallback,
}

/// Whole-word, case-insensitive farewell detection.
pub fn is_end_phrase(message: &str) -> bool {
    END_PHRASE.is_match(message)
}

/// Map a message to its topic. Callers skip blank messages before this.
pub fn classify(message: &str) -> Topic {
    if is_end_phrase(message) {
        return Topic::EndConversation;
    }

    let lower = message.to_lowercase();
    let words = tokenize(&lower);

    if contains_any(&lower, &VITALS_KEYWORDS) || has_word(&words, &VITALS_WORDS) {
        return Topic::Vitals;
    }

    if contains_any(&lower, &MEDICATION_KEYWORDS) {
        return Topic::Medication;
    }

    if contains_any(&lower, &PAIN_KEYWORDS) {
        return Topic::Pain;
    }

    if contains_any(&lower, &CARE_PRIORITY_KEYWORDS) {
        return Topic::CarePriorities;
    }

    if contains_any(&lower, &DISCHARGE_KEYWORDS) {
        return Topic::Discharge;
    }

    if contains_any(&lower, &ALLERGY_KEYWORDS) {
        return Topic::Allergy;
    }

    if contains_any(&lower, &ASSESSMENT_KEYWORDS) {
        return Topic::Assessment;
    }

    if let Some(field) = personal_field(&lower, &words) {
        return Topic::PersonalLookup(field);
    }

    Topic::Fallback
}

fn personal_field(lower: &str, words: &[String]) -> Option<PersonalField> {
    if has_word(words, &["name"]) {
        Some(PersonalField::Name)
    } else if has_word(words, &["gender"]) {
        Some(PersonalField::Gender)
    } else if has_word(words, &["age"]) {
        Some(PersonalField::Age)
    } else if lower.contains("marital status") {
        Some(PersonalField::MaritalStatus)
    } else if has_word(words, &["room"]) {
        Some(PersonalField::Room)
    } else if has_word(words, &["diagnosis"]) {
        Some(PersonalField::Diagnosis)
    } else if has_word(words, &["risk"]) {
        Some(PersonalField::RiskLevel)
    } else if has_word(words, &["acuity"]) {
        Some(PersonalField::Acuity)
    } else {
        None
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

fn has_word(words: &[String], candidates: &[&str]) -> bool {
    words
        .iter()
        .any(|word| candidates.iter().any(|candidate| word == candidate))
}

/// Lower-case alphanumeric tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}
