//! One template per topic. Output depends only on the topic, the message
//! (fallback echo) and the patient record.

use std::fmt::Write as _;

use handoff_core::{Medication, MedicationStatus, PatientRecord, RiskLevel};

use crate::classify::{PersonalField, Topic};
use crate::extract::{EntityFocus, EntityMatches, VitalTerm};
use crate::vitals::{self, PainTier};

pub const FAREWELL: &str =
    "You're welcome! If you need further assistance, just ask. Ending the AI assistant chat.";

const NOT_SPECIFIED: &str = "Not specified";
const NOT_RECORDED: &str = "Not recorded";

pub fn render(topic: Topic, message: &str, patient: &PatientRecord) -> String {
    match topic {
        Topic::EndConversation => FAREWELL.to_string(),
        Topic::Vitals => render_vitals(patient),
        Topic::Medication => render_medications(patient),
        Topic::Pain => render_pain(patient),
        Topic::CarePriorities => render_care_priorities(patient),
        Topic::Discharge => render_discharge(patient),
        Topic::Allergy => render_allergies(patient),
        Topic::Assessment => render_assessment(patient),
        Topic::PersonalLookup(field) => render_personal(field, patient),
        Topic::Fallback => render_fallback(message, patient),
    }
}

fn age_text(patient: &PatientRecord, missing: &str) -> String {
    patient
        .demographics
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| missing.to_string())
}

fn risk_upper(risk: RiskLevel) -> String {
    risk.as_str().to_uppercase()
}

pub fn render_vitals(patient: &PatientRecord) -> String {
    let findings = vitals::evaluate(&patient.vitals);
    let analysis = vitals::format_analysis(&findings);

    format!(
        "Vital signs analysis for {name}:

{analysis}Monitoring frequency:
- Acuity level {acuity}: reassess vital signs {interval}

Next steps:
- Trend readings against previous values rather than single measurements
- Recheck any abnormal value before escalating
- Notify the provider of sustained abnormal findings
- Document all readings and interventions in the flowsheet",
        name = patient.name,
        acuity = patient.acuity_level,
        interval = vitals::monitoring_interval(patient.acuity_level),
    )
}

fn medication_line(med: &Medication) -> String {
    let frequency = if med.frequency.is_empty() {
        NOT_SPECIFIED
    } else {
        med.frequency.as_str()
    };
    let indication = if med.indication.is_empty() {
        NOT_SPECIFIED
    } else {
        med.indication.as_str()
    };

    format!(
        "- {} ({} {}, {frequency}) - {indication}\n  Next due: {} | Last given: {}\n",
        med.name,
        med.dosage,
        med.route,
        med.next_due.as_deref().unwrap_or("Not scheduled"),
        med.last_given.as_deref().unwrap_or(NOT_RECORDED),
    )
}

pub fn render_medications(patient: &PatientRecord) -> String {
    let active: Vec<&Medication> = patient
        .medications_with_status(MedicationStatus::Active)
        .collect();
    let held: Vec<&Medication> = patient
        .medications_with_status(MedicationStatus::Held)
        .collect();

    let mut guidance = format!("Medication management for {}:\n\n", patient.name);

    for (label, meds) in [("Active", &active), ("Held", &held)] {
        if meds.is_empty() {
            let _ = write!(guidance, "No {} medications found.\n\n", label.to_lowercase());
            continue;
        }
        let _ = writeln!(guidance, "{label} medications ({}):", meds.len());
        for med in meds.iter() {
            guidance.push_str(&medication_line(med));
        }
        guidance.push('\n');
    }

    if patient.has_allergies() {
        let _ = write!(
            guidance,
            "Allergy cross-check:\n- Documented allergies: {} - verify every medication above against this list before administration\n\n",
            patient.allergy_list()
        );
    }

    let _ = write!(
        guidance,
        "General medication safety recommendations:
- Verify patient allergies before administering any medications
- Double-check all high-risk medications (e.g., anticoagulants, insulin)
- Ensure correct patient, drug, dose, route, and time (5 rights of medication administration)
- Monitor for and document any side effects or adverse reactions
- Educate patient about their medications, including purpose, dosage, and potential side effects
- Encourage adherence to prescribed medication regimen

Special considerations for {name}:
- {diagnosis} may require specific medication adjustments
- Renal or hepatic impairment? Adjust doses accordingly and monitor closely
- Elderly patients may be more sensitive to medications - start low, go slow
- Be cautious with medications that can cause sedation or respiratory depression, especially in patients with compromised respiratory function

Consult pharmacy for:
- Any drug interaction concerns
- Clarification of medication orders
- Patient-specific medication counseling
",
        name = patient.name,
        diagnosis = patient.primary_diagnosis,
    );

    guidance
}

pub fn render_pain(patient: &PatientRecord) -> String {
    let (level, severity) = match patient.vitals.pain_level {
        Some(score) => (
            format!("{score}/10 (0 = no pain, 10 = worst pain imaginable)"),
            PainTier::from_score(score).description().to_string(),
        ),
        None => (
            NOT_RECORDED.to_string(),
            "unknown (obtain a pain score before intervening)".to_string(),
        ),
    };

    let descriptor = patient.pain.clone().unwrap_or_default();
    let field = |value: Option<String>| value.unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        "Pain management for {name}:

Current pain status:
- Pain level: {level}
- Severity: {severity}
- Location: {location}
- Quality: {quality}
- Duration: {duration}
- Aggravating factors: {aggravating}
- Alleviating factors: {relieving}

Recommended interventions:
- Pharmacological:
  - Administer prescribed analgesics (e.g., acetaminophen, ibuprofen, opioids)
  - Consider adjuvant medications (e.g., anticonvulsants, antidepressants) for neuropathic pain
  - Use patient-controlled analgesia (PCA) if appropriate
- Non-pharmacological:
  - Positioning and comfort measures
  - Heat/cold therapy as appropriate
  - Relaxation techniques and distraction
  - Environmental modifications (lighting, noise)

Monitoring requirements:
- Reassessment every 30-60 minutes after intervention
- Document pain scores, interventions, effectiveness
- Alert if pain >7/10 or sudden increase in pain level

Special considerations:
- Diagnosis: {diagnosis} may cause specific pain patterns
- Age: {age} years - consider age-related factors
- Risk Level: {risk} - may affect medication choices",
        name = patient.name,
        location = field(descriptor.location),
        quality = field(descriptor.quality),
        duration = field(descriptor.duration),
        aggravating = field(descriptor.aggravating_factors),
        relieving = field(descriptor.relieving_factors),
        diagnosis = patient.primary_diagnosis,
        age = age_text(patient, "N/A"),
        risk = risk_upper(patient.risk_level),
    )
}

/// Immediate priorities, one line per condition that holds, in fixed order.
pub fn care_priorities(patient: &PatientRecord) -> Vec<&'static str> {
    let mut priorities = Vec::new();

    if patient.risk_level.is_critical() {
        priorities.push("Critical monitoring: Continuous assessment required");
    }
    if patient.acuity_level.is_high() {
        priorities.push("High acuity: Frequent vital signs and assessments");
    }
    if patient.has_allergies() {
        priorities.push("Allergy safety: Verify all medications and treatments");
    }
    if patient.vitals.pain_level.is_some_and(|pain| pain > 5) {
        priorities.push("Pain management: Address elevated pain level");
    }
    if patient.active_medication_count() > 0 {
        priorities.push("Medication safety: Monitor for interactions and effects");
    }

    priorities
}

pub fn render_care_priorities(patient: &PatientRecord) -> String {
    let priorities = care_priorities(patient);
    let immediate = if priorities.is_empty() {
        "- Routine care: No immediate escalations identified".to_string()
    } else {
        bullet_list(&priorities)
    };

    let allergy_line = if patient.has_allergies() {
        format!("\n- Allergy precautions: {}", patient.allergy_list())
    } else {
        String::new()
    };

    format!(
        "Nursing care priorities for {name}:

Immediate priorities:
{immediate}

Systematic care plan:

1. Safety & Monitoring
- Continuous monitoring per acuity level {acuity}
- Fall risk assessment and precautions
- Infection control measures{allergy_line}

2. Physiological Needs
- Vital signs monitoring and trending
- Pain assessment and management
- Medication administration and monitoring
- Nutrition and hydration status

3. Psychosocial Support
- Patient and family education
- Emotional support and coping strategies
- Communication with healthcare team
- Discharge planning preparation

4. Documentation
- Accurate and timely charting
- Incident reporting as needed
- Care plan updates
- Handoff communication

Condition-specific interventions:
Based on {diagnosis}:
- Monitor for specific complications
- Implement evidence-based protocols
- Coordinate with interdisciplinary team
- Patient education on condition management",
        name = patient.name,
        acuity = patient.acuity_level,
        diagnosis = patient.primary_diagnosis,
    )
}

pub fn render_discharge(patient: &PatientRecord) -> String {
    let allergy_line = if patient.has_allergies() {
        format!("\n- Allergies: {} - ensure awareness", patient.allergy_list())
    } else {
        String::new()
    };

    format!(
        "Discharge planning for {name}:

Readiness assessment:
- Medical stability: Vital signs stable for 24+ hours, pain controlled with oral medications, no acute complications from {diagnosis}
- Functional status: Able to perform activities of daily living, mobility appropriate for home environment, cognitive function adequate for self-care
- Medication management: Medication reconciliation completed, patient/family understands medication regimen, pharmacy arrangements made

Discharge checklist:
Medical clearance:
- Physician discharge order obtained
- All treatments completed
- Follow-up appointments scheduled
- Diagnostic results reviewed

Medications:
- Reconcile home vs. hospital medications
- Provide written medication list
- Ensure patient has adequate supply
- Review administration instructions

Patient education:
- Diagnosis and treatment explanation
- Activity restrictions and guidelines
- When to seek medical attention
- Emergency contact information

Home preparation:
- Home safety assessment completed
- Medical equipment arranged if needed
- Home health services coordinated
- Transportation arranged

Follow-up care:
- Primary care physician appointment
- Specialist referrals as needed
- Home health nursing if indicated
- Physical therapy if required

Warning signs to report (specific to {diagnosis}):
- Worsening symptoms
- New or increased pain
- Signs of infection
- Medication side effects

Special considerations:
- Age: {age} years - may need additional support
- Risk Level: {risk} - enhanced monitoring needed{allergy_line}",
        name = patient.name,
        diagnosis = patient.primary_diagnosis,
        age = age_text(patient, "N/A"),
        risk = risk_upper(patient.risk_level),
    )
}

/// Known cross-reactivity guidance for an allergy name, if any.
pub fn cross_reaction(allergy: &str) -> String {
    let lower = allergy.to_lowercase();
    if lower.contains("penicillin") {
        "- Penicillin allergy: Avoid all beta-lactam antibiotics, use alternative antibiotics"
            .to_string()
    } else if lower.contains("latex") {
        "- Latex allergy: Use latex-free gloves and equipment, watch for cross-reactions with banana, avocado, kiwi and chestnut"
            .to_string()
    } else if lower.contains("sulfa") {
        "- Sulfa allergy: Avoid sulfonamide antibiotics (e.g., sulfamethoxazole), use caution with other sulfonamide-containing drugs"
            .to_string()
    } else {
        format!("- {allergy}: Research potential cross-reactions before new medications")
    }
}

pub fn render_allergies(patient: &PatientRecord) -> String {
    if !patient.has_allergies() {
        return format!(
            "Allergy status for {}:

No known allergies documented.

Safety protocols:
- Always ask about allergies before any intervention
- Monitor for new allergic reactions
- Document any new allergies immediately
- Educate patient about reporting reactions

Vigilance required:
Even with no known allergies, remain alert for:
- First-time medication reactions
- Food allergies during meal service
- Environmental allergens (latex, cleaning products)
- Cross-reactions with new substances",
            patient.name
        );
    }

    let critical = patient
        .allergies
        .iter()
        .map(|allergy| format!("- {} - Verify before any intervention", allergy.to_uppercase()))
        .collect::<Vec<_>>()
        .join("\n");
    let cross = patient
        .allergies
        .iter()
        .map(|allergy| cross_reaction(allergy))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Allergy management for {name}:

Critical allergies:
{critical}

Safety protocols:
Before any medication/treatment:
- Verify allergy band is present and accurate
- Check electronic medical record
- Ask patient to confirm allergies
- Cross-reference with medication orders

Emergency preparedness:
- Know location of emergency medications (epinephrine, Benadryl)
- Have crash cart readily available
- Know rapid response activation process
- Ensure allergy information is visible on chart

Cross-reaction awareness:
{cross}

Documentation requirements:
- All allergies clearly documented in chart
- Allergy band present and legible
- Reaction type and severity noted
- Date of last reaction if known

Patient education:
- Ensure patient knows their allergies
- Provide written allergy list for discharge
- Teach importance of informing all healthcare providers
- Discuss medical alert jewelry/cards",
        name = patient.name,
    )
}

fn assessment_frequency(patient: &PatientRecord) -> String {
    let interval = vitals::monitoring_interval(patient.acuity_level);
    if patient.risk_level.is_critical() {
        format!("Continuous monitoring (critical risk), full reassessment {interval}")
    } else {
        format!("Full reassessment {interval} (acuity level {})", patient.acuity_level)
    }
}

pub fn render_assessment(patient: &PatientRecord) -> String {
    let recorded = &patient.vitals;
    let reading = |value: Option<String>| value.unwrap_or_else(|| NOT_RECORDED.to_string());

    let allergies = if patient.has_allergies() {
        format!("- {} (verify before interventions)", patient.allergy_list())
    } else {
        "- No known allergies".to_string()
    };

    format!(
        "Assessment guidance for {name}:

Assessment frequency: {frequency}

1. General Appearance:
- Observe for distress, discomfort, or changes in mental status
- Note posture, mobility, and ability to communicate

2. Vital Signs:
- Temperature: {temperature}
- Blood Pressure: {blood_pressure}
- Heart Rate: {heart_rate}
- Respiratory Rate: {respiratory_rate}
- Oxygen Saturation: {saturation}
- Pain Level: {pain}

3. Cardiovascular:
- Apical and peripheral pulses, capillary refill, edema
- Heart sounds and rhythm changes

4. Respiratory:
- Breath sounds, work of breathing, cough and sputum
- Oxygen requirement and device

5. Neurological:
- Level of consciousness and orientation
- Pupils, motor strength, sensation, speech

6. Gastrointestinal:
- Bowel sounds, abdominal tenderness or distension
- Appetite, nausea, last bowel movement

7. Genitourinary:
- Urine output, color, and continence
- Catheter patency and care if present

8. Integumentary:
- Skin color, temperature, and turgor
- Pressure points, wounds, surgical sites, IV sites

9. Psychosocial:
- Assess mood, coping, and support systems
- Identify any barriers to care or discharge

10. Focused Assessment:
- Primary diagnosis: {diagnosis}
- Assess for complications or changes related to diagnosis
- Monitor for abnormal findings in vital signs or symptoms

11. Allergies:
{allergies}

12. Medication Review:
- Check for new, held, or high-risk medications
- Monitor for side effects or adverse reactions

13. Functional Status:
- Assess mobility, fall risk, and ability to perform activities of daily living
- Evaluate cognitive status and orientation

Documentation:
- Record all findings, interventions, and patient responses
- Notify provider of any abnormal or concerning findings

Would you like a more detailed assessment in a specific area?",
        name = patient.name,
        frequency = assessment_frequency(patient),
        temperature = reading(recorded.temperature.map(vitals::format_temperature)),
        blood_pressure = reading(recorded.blood_pressure.map(vitals::format_blood_pressure)),
        heart_rate = reading(recorded.heart_rate.map(|hr| format!("{hr} bpm"))),
        respiratory_rate = reading(recorded.respiratory_rate.map(|rr| format!("{rr}/min"))),
        saturation = reading(recorded.oxygen_saturation.map(|ox| format!("{ox}%"))),
        pain = reading(recorded.pain_level.map(|pain| format!("{pain}/10"))),
        diagnosis = patient.primary_diagnosis,
    )
}

pub fn render_personal(field: PersonalField, patient: &PatientRecord) -> String {
    let demographics = &patient.demographics;
    let or_unspecified =
        |value: Option<&String>| value.map_or(NOT_SPECIFIED.to_string(), |v| v.to_string());

    match field {
        PersonalField::Name => format!("Patient name: {}", patient.name),
        PersonalField::Gender => {
            format!("Patient gender: {}", or_unspecified(demographics.gender.as_ref()))
        }
        PersonalField::Age => format!("Patient age: {}", age_text(patient, NOT_SPECIFIED)),
        PersonalField::MaritalStatus => format!(
            "Patient marital status: {}",
            or_unspecified(demographics.marital_status.as_ref())
        ),
        PersonalField::Room => format!("Patient room: {}", patient.room),
        PersonalField::Diagnosis => format!("Primary diagnosis: {}", patient.primary_diagnosis),
        PersonalField::RiskLevel => format!("Risk level: {}", patient.risk_level),
        PersonalField::Acuity => format!("Acuity level: {}", patient.acuity_level),
    }
}

pub fn render_fallback(message: &str, patient: &PatientRecord) -> String {
    let risk_note = if patient.risk_level.is_critical() {
        "requires continuous monitoring"
    } else {
        "requires regular assessment"
    };
    let acuity_note = if patient.acuity_level.is_high() {
        "high priority"
    } else {
        "standard monitoring"
    };
    let allergy_line = if patient.has_allergies() {
        format!("\n- ALLERGY ALERT: {}", patient.allergy_list())
    } else {
        String::new()
    };

    format!(
        "Clinical guidance for {name}:

Based on your question about \"{message}\", here's my analysis:

Current status:
- Condition: {diagnosis}
- Risk Level: {risk_upper} ({risk_note})
- Acuity: Level {acuity} ({acuity_note})

Immediate considerations:
- Monitor for complications related to {diagnosis}
- Maintain safety precautions for {risk} risk patients
- Follow protocols for acuity level {acuity}{allergy_line}

Recommendations:
- Perform systematic head-to-toe assessment
- Review medication administration record
- Assess pain and comfort level
- Monitor for signs of deterioration
- Document all findings and interventions

Would you like specific guidance on any particular aspect of {name}'s care?",
        name = patient.name,
        diagnosis = patient.primary_diagnosis,
        risk_upper = risk_upper(patient.risk_level),
        risk = patient.risk_level,
        acuity = patient.acuity_level,
    )
}

/// Combined reply for the highest-precedence entity category.
/// Returns `None` when nothing matched.
pub fn render_entities(matches: &EntityMatches, patient: &PatientRecord) -> Option<String> {
    let reply = match matches.focus()? {
        EntityFocus::Vitals(terms) => terms
            .iter()
            .map(|term| vital_reading(*term, patient))
            .collect::<Vec<_>>()
            .join("\n"),
        EntityFocus::Symptoms(found) => format!(
            "Symptom(s) detected: {}. Please monitor and document appropriately.",
            found.join(", ")
        ),
        EntityFocus::Labs(found) => format!(
            "Lab(s) detected: {}. Please review latest results in the chart.",
            found.join(", ")
        ),
        EntityFocus::Diagnoses(found) => format!(
            "Diagnosis detected: {}. Refer to protocols for management.",
            found.join(", ")
        ),
        EntityFocus::Procedures(found) => format!(
            "Procedure(s) detected: {}. Ensure all safety and documentation protocols are followed.",
            found.join(", ")
        ),
        EntityFocus::Medications(found) => format!(
            "Medication(s) detected: {}. Review administration schedule and monitor for side effects.",
            found.join(", ")
        ),
        EntityFocus::Allergies(found) => format!(
            "Allergy detected: {}. Ensure strict avoidance and monitor for reactions.",
            found.join(", ")
        ),
    };
    Some(reply)
}

fn vital_reading(term: VitalTerm, patient: &PatientRecord) -> String {
    let recorded = &patient.vitals;
    let missing = |what: &str| format!("No {what} recorded for {}.", patient.name);
    const NORMAL: &str = "This is within the normal range.";

    match term {
        VitalTerm::Temperature => match recorded.temperature {
            None => missing("temperature"),
            Some(temp) => {
                let status = if vitals::is_fever(temp) {
                    "This is considered a fever (abnormal)."
                } else if vitals::is_hypothermia(temp) {
                    "This is considered hypothermia (abnormal)."
                } else {
                    NORMAL
                };
                format!("Current temperature: {}. {status}", vitals::format_temperature(temp))
            }
        },
        VitalTerm::BloodPressure => match recorded.blood_pressure {
            None => missing("blood pressure"),
            Some(bp) => {
                let status = if vitals::is_hypertension(bp) {
                    "This is considered high (hypertension, abnormal)."
                } else if vitals::is_hypotension(bp) {
                    "This is considered low (hypotension, abnormal)."
                } else {
                    NORMAL
                };
                format!("Current blood pressure: {}. {status}", vitals::format_blood_pressure(bp))
            }
        },
        VitalTerm::HeartRate => match recorded.heart_rate {
            None => missing("heart rate"),
            Some(hr) => {
                let status = if vitals::is_tachycardia(hr) {
                    "This is considered tachycardia (abnormal)."
                } else if vitals::is_bradycardia(hr) {
                    "This is considered bradycardia (abnormal)."
                } else {
                    NORMAL
                };
                format!("Current heart rate: {hr} bpm. {status}")
            }
        },
        VitalTerm::OxygenSaturation => match recorded.oxygen_saturation {
            None => missing("oxygen saturation"),
            Some(ox) => {
                let status = if vitals::is_low_oxygen(ox) {
                    "This is considered low (abnormal)."
                } else {
                    NORMAL
                };
                format!("Current oxygen saturation: {ox}%. {status}")
            }
        },
        VitalTerm::RespiratoryRate => match recorded.respiratory_rate {
            None => missing("respiratory rate"),
            Some(rr) => {
                let status = if rr > vitals::TACHYPNEA_ABOVE {
                    "This is considered tachypnea (abnormal)."
                } else if rr < vitals::BRADYPNEA_BELOW {
                    "This is considered bradypnea (abnormal)."
                } else {
                    NORMAL
                };
                format!("Current respiratory rate: {rr}/min. {status}")
            }
        },
        VitalTerm::Weight => match recorded.weight {
            None => missing("weight"),
            Some(weight) => format!("Current weight: {weight} kg."),
        },
        VitalTerm::Height => match recorded.height {
            None => missing("height"),
            Some(height) => format!("Current height: {height} cm."),
        },
        VitalTerm::Pain => match recorded.pain_level {
            None => missing("pain level"),
            Some(pain) => {
                let status = match PainTier::from_score(pain) {
                    PainTier::Severe => "Severe pain (immediate intervention needed).",
                    PainTier::Moderate => "Moderate pain (management indicated).",
                    PainTier::Mild => "Mild pain (monitor closely).",
                    PainTier::None => "No pain reported.",
                };
                format!("Current pain level: {pain}/10. {status}")
            }
        },
    }
}

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
