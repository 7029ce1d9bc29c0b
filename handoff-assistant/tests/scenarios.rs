use std::fs;

use handoff_assistant::{
    classify, parse_patient_str, respond, route, welcome_message, ConversationSession, Intent,
    SessionState, SubmitOutcome, Topic, FAREWELL,
};
use handoff_core::{AssistantConfig, AssistantError, ChatRole, PatientRecord};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn load(name: &str) -> PatientRecord {
    let json = fs::read_to_string(fixture_path(name)).expect("fixture readable");
    parse_patient_str(&json).expect("fixture is a valid patient")
}

fn critical() -> PatientRecord {
    load("critical_pain_patient.json")
}

fn stable() -> PatientRecord {
    load("stable_patient.json")
}

fn reply(patient: &PatientRecord, message: &str) -> String {
    respond(message, patient).expect("non-blank message gets a reply")
}

fn open_session(patient: &PatientRecord) -> ConversationSession {
    ConversationSession::open(patient.clone(), AssistantConfig::default()).expect("session opens")
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in:\n{haystack}"))
}

#[test]
fn pain_question_for_critical_patient() {
    let patient = critical();
    let message = "What's the pain management plan?";
    assert_eq!(classify(message), Topic::Pain);

    let text = reply(&patient, message);
    assert!(text.contains("8/10"));
    assert!(text.contains("severe"));
    assert!(text.contains("Location: Sternal incision"));
    assert!(text.contains("Diagnosis: Post-operative cardiac surgery"));
    assert!(text.contains("Age: 67 years"));
    assert!(text.contains("Risk Level: CRITICAL"));
}

#[test]
fn welcome_banners_keep_their_order() {
    let text = welcome_message(&critical());
    let risk = position(&text, "CRITICAL risk level - requires continuous monitoring.");
    let acuity = position(&text, "High acuity level 5 - frequent assessments needed.");
    let allergy = position(
        &text,
        "Allergies: Penicillin, Latex - verify before any interventions.",
    );
    assert!(risk < acuity && acuity < allergy);

    assert!(text.contains("Pain level 8/10 - requires intervention."));
    assert!(text.contains("Temperature 103°F - monitor closely."));
    assert!(text.contains("1 active medications - check for interactions."));
    assert!(text.contains("Room: ICU-101 | Age: 67 | Female"));
}

#[test]
fn welcome_for_stable_patient_has_no_banners() {
    let text = welcome_message(&stable());
    assert!(text.contains("Room: MED-204 | Age: 45 | Male"));
    assert!(!text.contains("Alerts:"));
    assert!(!text.contains("Vital signs concerns:"));
    assert!(!text.contains("Medication status:"));
}

#[test]
fn blank_messages_append_nothing() {
    let patient = critical();
    let mut session = open_session(&patient);
    let before = session.messages().len();

    assert_eq!(session.submit(&patient, "").unwrap(), SubmitOutcome::Ignored);
    assert_eq!(session.submit(&patient, "   \n").unwrap(), SubmitOutcome::Ignored);
    assert_eq!(session.messages().len(), before);
    assert_eq!(respond("  ", &patient), None);
}

#[test]
fn medication_reply_partitions_active_and_held() {
    let text = reply(&critical(), "Any medication changes?");
    assert!(text.contains("Active medications (1):"));
    assert!(text.contains("- Metoprolol (25mg PO, BID) - Rate control"));
    assert!(text.contains("Next due: 2024-01-15T20:00:00Z | Last given: 2024-01-15T08:00:00Z"));
    assert!(text.contains("Held medications (1):"));
    assert!(text.contains("Next due: Not scheduled | Last given: Not recorded"));
    assert!(!text.contains("Cefazolin"));
    assert!(text.contains("Documented allergies: Penicillin, Latex"));

    let text = reply(&stable(), "Any medication changes?");
    assert!(text.contains("No active medications found."));
    assert!(text.contains("No held medications found."));
    assert!(!text.contains("Allergy cross-check"));
}

#[test]
fn allergy_reply_special_cases_known_cross_reactions() {
    let text = reply(&critical(), "Any allergies?");
    assert!(text.contains("- PENICILLIN - Verify before any intervention"));
    assert!(text.contains("Penicillin allergy: Avoid all beta-lactam antibiotics"));
    assert!(text.contains("Latex allergy: Use latex-free gloves"));
    assert!(!text.contains("Research potential cross-reactions"));

    let text = reply(&stable(), "Any allergies?");
    assert!(text.contains("No known allergies documented."));
}

#[test]
fn vitals_reply_lists_abnormal_before_normal() {
    let text = reply(&critical(), "Show me the vitals");
    let abnormal = position(&text, "Abnormal findings & suggestions:");
    assert!(text.contains("Fever: 103°F. Suggest: Give antipyretics"));
    assert!(text.contains("Severe pain: 8/10. Suggest:"));
    assert!(!text.contains("Normal findings:"));
    assert!(abnormal < position(&text, "Monitoring frequency:"));
    assert!(text.contains("Acuity level 5: reassess vital signs every 1-2 hours"));

    let text = reply(&stable(), "Show me the vitals");
    assert!(!text.contains("Abnormal findings"));
    assert!(text.contains("Temperature: 98.6°F (Normal)"));
    assert!(text.contains("Blood Pressure: 122/78 mmHg (Normal)"));
    assert!(text.contains("Mild pain: 2/10 (Monitor)"));
    assert!(text.contains("every 6-8 hours"));
}

#[test]
fn assessment_marks_missing_readings() {
    let text = reply(&critical(), "Please examine her");
    assert!(text.contains("Heart Rate: Not recorded"));
    assert!(text.contains("Temperature: 103°F"));
    assert!(text.contains("Continuous monitoring (critical risk)"));
    assert!(text.contains("7. Genitourinary:"));
}

#[test]
fn care_priorities_follow_condition_order() {
    let text = reply(&critical(), "What are the priorities?");
    let order = [
        "Critical monitoring",
        "High acuity",
        "Allergy safety",
        "Pain management: Address elevated pain level",
        "Medication safety",
    ];
    let positions: Vec<usize> = order.iter().map(|line| position(&text, line)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let text = reply(&stable(), "What are the priorities?");
    assert!(text.contains("- Routine care: No immediate escalations identified"));
}

#[test]
fn discharge_caveats_depend_on_allergies() {
    let text = reply(&critical(), "Is she ready to go home?");
    assert!(text.contains("Medical clearance:"));
    assert!(text.contains("Allergies: Penicillin, Latex - ensure awareness"));

    let text = reply(&stable(), "Is he ready to go home?");
    assert!(!text.contains("ensure awareness"));
}

#[test]
fn personal_lookups_fall_back_to_not_specified() {
    let patient = stable();
    assert_eq!(reply(&patient, "What is his age?"), "Patient age: 45");
    assert_eq!(reply(&patient, "Marital status?"), "Patient marital status: Not specified");
    assert_eq!(reply(&critical(), "Which room?"), "Patient room: ICU-101");
    assert_eq!(reply(&critical(), "Acuity?"), "Acuity level: 5");
}

#[test]
fn entity_replies_answer_unmatched_messages() {
    let patient = stable();

    let routed = route("How is his heart rate?", &patient);
    assert_eq!(routed.intent, Intent::Entities);
    assert_eq!(
        routed.text,
        "Current heart rate: 76 bpm. This is within the normal range."
    );

    assert_eq!(
        reply(&critical(), "How is her heart rate?"),
        "No heart rate recorded for Sarah Johnson."
    );
    let sarah = critical();
    let cases = [
        (&patient, "What's the potassium?", "Lab(s) detected: potassium."),
        (&patient, "Is the potassium from her fever?", "Symptom(s) detected: fever."),
        (&sarah, "Is Metoprolol due?", "Medication(s) detected: Metoprolol."),
    ];
    for (record, message, prefix) in cases {
        assert!(reply(record, message).starts_with(prefix), "message: {message}");
    }
    assert_eq!(
        reply(&patient, "What's his pulse?"),
        "Current heart rate: 76 bpm. This is within the normal range."
    );
}

#[test]
fn fallback_echoes_the_question() {
    let text = reply(&stable(), "Tell me something useful");
    assert!(text.contains("Based on your question about \"Tell me something useful\""));
    assert!(text.contains("Risk Level: LOW (requires regular assessment)"));
    assert!(!text.contains("ALLERGY ALERT"));

    let text = reply(&critical(), "Tell me something useful");
    assert!(text.contains("- ALLERGY ALERT: Penicillin, Latex"));
}

#[test]
fn end_phrase_closes_the_session() {
    let patient = stable();
    let mut session = open_session(&patient);

    let outcome = session.submit(&patient, "thanks, bye").unwrap();
    let SubmitOutcome::Closing(farewell) = &outcome else {
        panic!("expected closing outcome, got {outcome:?}");
    };
    assert_eq!(farewell.content, FAREWELL);
    assert_eq!(session.state(), SessionState::Closing);

    assert_eq!(session.submit(&patient, "pain?").unwrap(), SubmitOutcome::Ignored);
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn session_alerts_once_per_snapshot() {
    let mut patient = critical();
    let mut session = open_session(&patient);

    let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 3);
    assert!(contents[1].starts_with("Severe pain detected for Sarah Johnson (8/10)"));
    assert!(contents[2].starts_with("Fever detected for Sarah Johnson (103°F)"));

    assert!(session.on_vitals_changed(&patient).unwrap().is_empty());

    patient.vitals.temperature = Some(99.1);
    let alerts = session.on_vitals_changed(&patient).unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("Severe pain detected"));
    assert_eq!(session.messages().len(), 4);
    assert!(session
        .messages()
        .iter()
        .all(|m| m.role == ChatRole::Assistant));
}

#[test]
fn session_rejects_other_patients_and_rebinds() {
    let patient = critical();
    let other = stable();
    let mut session = ConversationSession::open(patient, AssistantConfig::default()).unwrap();

    assert!(matches!(
        session.submit(&other, "pain?"),
        Err(AssistantError::PatientMismatch { .. })
    ));

    assert!(session.rebind(other.clone()).unwrap());
    assert_eq!(session.patient().id, "pt-002");
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].id, "1");
    assert!(session.messages()[0].content.contains("Michael Brown"));

    let outcome = session.submit(&other, "Which room?").unwrap();
    let SubmitOutcome::Replied(answer) = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(answer.content, "Patient room: MED-204");
}
