use handoff_core::PatientRecord;

use crate::vitals;

/// Greeting that opens every session, with banners for whatever needs
/// attention right now.
pub fn welcome_message(patient: &PatientRecord) -> String {
    let mut alerts = Vec::new();
    if patient.risk_level.is_critical() {
        alerts.push("CRITICAL risk level - requires continuous monitoring.".to_string());
    }
    if patient.acuity_level.is_high() {
        alerts.push(format!(
            "High acuity level {} - frequent assessments needed.",
            patient.acuity_level
        ));
    }
    if patient.has_allergies() {
        alerts.push(format!(
            "Allergies: {} - verify before any interventions.",
            patient.allergy_list()
        ));
    }

    let mut concerns = Vec::new();
    if let Some(pain) = patient.vitals.pain_level.filter(|pain| *pain > 5) {
        concerns.push(format!("Pain level {pain}/10 - requires intervention."));
    }
    if let Some(temp) = patient
        .vitals
        .temperature
        .filter(|t| vitals::is_fever(*t) || vitals::is_hypothermia(*t))
    {
        concerns.push(format!(
            "Temperature {} - monitor closely.",
            vitals::format_temperature(temp)
        ));
    }

    let mut medication = Vec::new();
    let active = patient.active_medication_count();
    if active > 0 {
        medication.push(format!("{active} active medications - check for interactions."));
    }

    let demographics = &patient.demographics;
    let mut message = format!(
        "Hello! I'm your clinical assistant for {name}.

Patient overview:
Diagnosis: {diagnosis}
Room: {room} | Age: {age} | {gender}
Risk: {risk} | Acuity: {acuity}
",
        name = patient.name,
        diagnosis = patient.primary_diagnosis,
        room = patient.room,
        age = demographics
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        gender = demographics.gender.as_deref().unwrap_or("N/A"),
        risk = patient.risk_level.as_str().to_uppercase(),
        acuity = patient.acuity_level,
    );

    for (heading, lines) in [
        ("Alerts", &alerts),
        ("Vital signs concerns", &concerns),
        ("Medication status", &medication),
    ] {
        if lines.is_empty() {
            continue;
        }
        message.push_str(heading);
        message.push_str(":\n");
        for line in lines.iter() {
            message.push_str("- ");
            message.push_str(line);
            message.push('\n');
        }
        message.push('\n');
    }

    message.push_str(&format!(
        "I can help with:
- Clinical assessments and monitoring priorities
- Medication management and safety checks
- Pain management strategies
- Discharge planning and readiness
- Evidence-based nursing interventions
- Documentation guidance

Use the quick action buttons above or ask me anything about {}'s care.",
        patient.name
    ));

    message
}
