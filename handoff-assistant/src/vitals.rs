//! Threshold classification of recorded vital signs.
//!
//! | Vital | Low (exclusive) | High (exclusive) |
//! |---|---|---|
//! | temperature °F | < 96 hypothermia | > 101 fever |
//! | blood pressure | sys < 90 or dia < 60 | sys > 140 or dia > 90 |
//! | heart rate | < 60 bradycardia | > 100 tachycardia |
//! | respiratory rate | < 12 bradypnea | > 24 tachypnea |
//! | SpO2 % | – | < 95 |
//! | pain 0-10 | tiered: 0 none, 1-3 mild, 4-6 moderate, ≥ 7 severe |

use handoff_core::{AcuityLevel, BloodPressure, VitalsSnapshot};
use serde::Serialize;

pub const FEVER_ABOVE_F: f64 = 101.0;
pub const HYPOTHERMIA_BELOW_F: f64 = 96.0;
pub const SYSTOLIC_HIGH_ABOVE: u16 = 140;
pub const DIASTOLIC_HIGH_ABOVE: u16 = 90;
pub const SYSTOLIC_LOW_BELOW: u16 = 90;
pub const DIASTOLIC_LOW_BELOW: u16 = 60;
pub const TACHYCARDIA_ABOVE: u16 = 100;
pub const BRADYCARDIA_BELOW: u16 = 60;
pub const TACHYPNEA_ABOVE: u16 = 24;
pub const BRADYPNEA_BELOW: u16 = 12;
pub const LOW_SPO2_BELOW: f64 = 95.0;
pub const SEVERE_PAIN_FROM: u8 = 7;
pub const MODERATE_PAIN_FROM: u8 = 4;

const NO_VITALS_RECORDED: &str =
    "No recent vital signs recorded. Please obtain baseline measurements.\n";

/// Evaluated vitals, in display order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalSign {
    Temperature,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    OxygenSaturation,
    Pain,
}

impl VitalSign {
    pub fn display_name(self) -> &'static str {
        match self {
            VitalSign::Temperature => "Temperature",
            VitalSign::BloodPressure => "Blood Pressure",
            VitalSign::HeartRate => "Heart Rate",
            VitalSign::RespiratoryRate => "Respiratory Rate",
            VitalSign::OxygenSaturation => "Oxygen Saturation",
            VitalSign::Pain => "Pain Level",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Normal,
    Abnormal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PainTier {
    None,
    Mild,
    Moderate,
    Severe,
}

impl PainTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= SEVERE_PAIN_FROM => PainTier::Severe,
            s if s >= MODERATE_PAIN_FROM => PainTier::Moderate,
            0 => PainTier::None,
            _ => PainTier::Mild,
        }
    }

    /// Lower-case tier name followed by the action it calls for.
    pub fn description(self) -> &'static str {
        match self {
            PainTier::Severe => "severe (immediate intervention needed)",
            PainTier::Moderate => "moderate (management indicated)",
            PainTier::Mild => "mild (monitor closely)",
            PainTier::None => "none (no pain reported)",
        }
    }
}

/// Result of checking one recorded vital against its thresholds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Finding {
    pub vital: VitalSign,
    /// Formatted reading with units, e.g. `103°F` or `150/95 mmHg`.
    pub value: String,
    pub status: FindingStatus,
    /// Clinical label: `Fever`, `Hypotension`, `Severe pain`, `Normal`...
    pub label: &'static str,
    /// Suggested actions, present for abnormal findings.
    pub advice: Option<&'static str>,
}

impl Finding {
    fn normal(vital: VitalSign, value: String) -> Self {
        Self {
            vital,
            value,
            status: FindingStatus::Normal,
            label: "Normal",
            advice: None,
        }
    }

    fn abnormal(
        vital: VitalSign,
        value: String,
        label: &'static str,
        advice: &'static str,
    ) -> Self {
        Self {
            vital,
            value,
            status: FindingStatus::Abnormal,
            label,
            advice: Some(advice),
        }
    }

    pub fn is_abnormal(&self) -> bool {
        self.status == FindingStatus::Abnormal
    }

    /// One line of the analysis text.
    pub fn summary_line(&self) -> String {
        match (self.status, self.advice) {
            (FindingStatus::Abnormal, Some(advice)) => {
                format!("{}: {}. Suggest: {advice}", self.heading(), self.value)
            }
            _ => match (self.vital, self.label) {
                (VitalSign::Pain, "Mild pain") => format!("Mild pain: {} (Monitor)", self.value),
                (VitalSign::Pain, _) => format!("Pain Level: {} (No pain)", self.value),
                (vital, _) => format!("{}: {} (Normal)", vital.display_name(), self.value),
            },
        }
    }

    fn heading(&self) -> &'static str {
        match self.label {
            "Hypertension" => "High BP",
            "Hypotension" => "Low BP",
            "Low oxygen saturation" => "Low O2 Sat",
            other => other,
        }
    }
}

pub fn format_temperature(value: f64) -> String {
    format!("{value}°F")
}

pub fn format_blood_pressure(bp: BloodPressure) -> String {
    format!("{bp} mmHg")
}

pub fn is_fever(temperature: f64) -> bool {
    temperature > FEVER_ABOVE_F
}

pub fn is_hypothermia(temperature: f64) -> bool {
    temperature < HYPOTHERMIA_BELOW_F
}

pub fn is_hypertension(bp: BloodPressure) -> bool {
    bp.systolic > SYSTOLIC_HIGH_ABOVE || bp.diastolic > DIASTOLIC_HIGH_ABOVE
}

pub fn is_hypotension(bp: BloodPressure) -> bool {
    bp.systolic < SYSTOLIC_LOW_BELOW || bp.diastolic < DIASTOLIC_LOW_BELOW
}

pub fn is_tachycardia(rate: u16) -> bool {
    rate > TACHYCARDIA_ABOVE
}

pub fn is_bradycardia(rate: u16) -> bool {
    rate < BRADYCARDIA_BELOW
}

pub fn is_low_oxygen(saturation: f64) -> bool {
    saturation < LOW_SPO2_BELOW
}

/// Classify every recorded vital. Absent fields produce no finding.
pub fn evaluate(vitals: &VitalsSnapshot) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(temp) = vitals.temperature {
        let value = format_temperature(temp);
        findings.push(if is_fever(temp) {
            Finding::abnormal(
                VitalSign::Temperature,
                value,
                "Fever",
                "Give antipyretics, monitor for infection, increase fluids, notify provider if persistent.",
            )
        } else if is_hypothermia(temp) {
            Finding::abnormal(
                VitalSign::Temperature,
                value,
                "Hypothermia",
                "Apply warming blankets, monitor for shivering, check for sepsis or exposure.",
            )
        } else {
            Finding::normal(VitalSign::Temperature, value)
        });
    }

    if let Some(bp) = vitals.blood_pressure {
        let value = format_blood_pressure(bp);
        findings.push(if is_hypertension(bp) {
            Finding::abnormal(
                VitalSign::BloodPressure,
                value,
                "Hypertension",
                "Recheck BP, assess for headache or vision changes, review antihypertensive meds, notify provider if sustained.",
            )
        } else if is_hypotension(bp) {
            Finding::abnormal(
                VitalSign::BloodPressure,
                value,
                "Hypotension",
                "Check for dizziness, increase fluids if allowed, lay patient flat, notify provider if symptomatic.",
            )
        } else {
            Finding::normal(VitalSign::BloodPressure, value)
        });
    }

    if let Some(rate) = vitals.heart_rate {
        let value = format!("{rate} bpm");
        findings.push(if is_tachycardia(rate) {
            Finding::abnormal(
                VitalSign::HeartRate,
                value,
                "Tachycardia",
                "Assess for pain, fever, dehydration, anxiety, check ECG if new.",
            )
        } else if is_bradycardia(rate) {
            Finding::abnormal(
                VitalSign::HeartRate,
                value,
                "Bradycardia",
                "Assess for dizziness, check medications (beta-blockers), monitor for syncope.",
            )
        } else {
            Finding::normal(VitalSign::HeartRate, value)
        });
    }

    if let Some(rate) = vitals.respiratory_rate {
        let value = format!("{rate}/min");
        findings.push(if rate > TACHYPNEA_ABOVE {
            Finding::abnormal(
                VitalSign::RespiratoryRate,
                value,
                "Tachypnea",
                "Assess for respiratory distress, check oxygen, encourage deep breathing.",
            )
        } else if rate < BRADYPNEA_BELOW {
            Finding::abnormal(
                VitalSign::RespiratoryRate,
                value,
                "Bradypnea",
                "Assess sedation, check for opioid use, stimulate patient, notify provider if <10.",
            )
        } else {
            Finding::normal(VitalSign::RespiratoryRate, value)
        });
    }

    if let Some(saturation) = vitals.oxygen_saturation {
        let value = format!("{saturation}%");
        findings.push(if is_low_oxygen(saturation) {
            Finding::abnormal(
                VitalSign::OxygenSaturation,
                value,
                "Low oxygen saturation",
                "Apply oxygen if ordered, check airway, encourage coughing/deep breathing, notify provider if <92%.",
            )
        } else {
            Finding::normal(VitalSign::OxygenSaturation, value)
        });
    }

    if let Some(score) = vitals.pain_level {
        findings.push(pain_finding(score));
    }

    findings
}

fn pain_finding(score: u8) -> Finding {
    let value = format!("{score}/10");
    match PainTier::from_score(score) {
        PainTier::Severe => Finding::abnormal(
            VitalSign::Pain,
            value,
            "Severe pain",
            "Administer prescribed analgesics, reassess in 30 min, notify provider if not relieved.",
        ),
        PainTier::Moderate => Finding::abnormal(
            VitalSign::Pain,
            value,
            "Moderate pain",
            "Give pain meds as ordered, use non-pharmacological methods, reassess.",
        ),
        PainTier::Mild => Finding {
            label: "Mild pain",
            ..Finding::normal(VitalSign::Pain, value)
        },
        PainTier::None => Finding {
            label: "No pain",
            ..Finding::normal(VitalSign::Pain, value)
        },
    }
}

/// Abnormal block first, then normal block, each in vital order.
pub fn format_analysis(findings: &[Finding]) -> String {
    let (concerns, normal): (Vec<&Finding>, Vec<&Finding>) =
        findings.iter().partition(|finding| finding.is_abnormal());

    if concerns.is_empty() && normal.is_empty() {
        return NO_VITALS_RECORDED.to_string();
    }

    let mut analysis = String::new();
    if !concerns.is_empty() {
        analysis.push_str("Abnormal findings & suggestions:\n");
        analysis.push_str(&join_lines(&concerns));
        analysis.push_str("\n\n");
    }
    if !normal.is_empty() {
        analysis.push_str("Normal findings:\n");
        analysis.push_str(&join_lines(&normal));
        analysis.push_str("\n\n");
    }
    analysis
}

fn join_lines(findings: &[&Finding]) -> String {
    findings
        .iter()
        .map(|finding| finding.summary_line())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reassessment cadence by acuity.
pub fn monitoring_interval(acuity: AcuityLevel) -> &'static str {
    match acuity.value() {
        level if level >= 4 => "every 1-2 hours",
        3 => "every 4 hours",
        _ => "every 6-8 hours",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pain_tiers_cover_the_scale() {
        let tiers: Vec<PainTier> = (0..=10).map(PainTier::from_score).collect();
        assert_eq!(tiers[0], PainTier::None);
        assert!(tiers[1..=3].iter().all(|t| *t == PainTier::Mild));
        assert!(tiers[4..=6].iter().all(|t| *t == PainTier::Moderate));
        assert!(tiers[7..=10].iter().all(|t| *t == PainTier::Severe));
    }

    #[test]
    fn monitoring_interval_follows_acuity() {
        let interval = |level| monitoring_interval(AcuityLevel::new(level).unwrap());
        assert_eq!(interval(5), "every 1-2 hours");
        assert_eq!(interval(4), "every 1-2 hours");
        assert_eq!(interval(3), "every 4 hours");
        assert_eq!(interval(2), "every 6-8 hours");
        assert_eq!(interval(1), "every 6-8 hours");
    }

    #[test]
    fn summary_lines_use_bedside_headings() {
        let vitals = VitalsSnapshot {
            blood_pressure: Some(BloodPressure {
                systolic: 150,
                diastolic: 95,
            }),
            oxygen_saturation: Some(91.0),
            pain_level: Some(2),
            ..VitalsSnapshot::default()
        };
        let lines: Vec<String> = evaluate(&vitals).iter().map(Finding::summary_line).collect();
        assert!(lines[0].starts_with("High BP: 150/95 mmHg. Suggest: Recheck BP"));
        assert!(lines[1].starts_with("Low O2 Sat: 91%. Suggest:"));
        assert_eq!(lines[2], "Mild pain: 2/10 (Monitor)");
    }

    fn only_finding(vitals: VitalsSnapshot) -> (FindingStatus, &'static str) {
        let findings = evaluate(&vitals);
        assert_eq!(findings.len(), 1, "{findings:?}");
        (findings[0].status, findings[0].label)
    }

    fn temperature(value: f64) -> VitalsSnapshot {
        VitalsSnapshot {
            temperature: Some(value),
            ..VitalsSnapshot::default()
        }
    }

    fn blood_pressure(systolic: u16, diastolic: u16) -> VitalsSnapshot {
        VitalsSnapshot {
            blood_pressure: Some(BloodPressure {
                systolic,
                diastolic,
            }),
            ..VitalsSnapshot::default()
        }
    }

    fn heart_rate(rate: u16) -> VitalsSnapshot {
        VitalsSnapshot {
            heart_rate: Some(rate),
            ..VitalsSnapshot::default()
        }
    }

    fn respiratory_rate(rate: u16) -> VitalsSnapshot {
        VitalsSnapshot {
            respiratory_rate: Some(rate),
            ..VitalsSnapshot::default()
        }
    }

    #[test]
    fn thresholds_are_exclusive_at_both_ends() {
        use FindingStatus::{Abnormal, Normal};

        let cases = [
            (temperature(95.9), Abnormal, "Hypothermia"),
            (temperature(96.0), Normal, "Normal"),
            (temperature(101.0), Normal, "Normal"),
            (temperature(101.1), Abnormal, "Fever"),
            (blood_pressure(89, 70), Abnormal, "Hypotension"),
            (blood_pressure(90, 60), Normal, "Normal"),
            (blood_pressure(140, 90), Normal, "Normal"),
            (blood_pressure(141, 80), Abnormal, "Hypertension"),
            (blood_pressure(120, 59), Abnormal, "Hypotension"),
            (heart_rate(59), Abnormal, "Bradycardia"),
            (heart_rate(60), Normal, "Normal"),
            (heart_rate(100), Normal, "Normal"),
            (heart_rate(101), Abnormal, "Tachycardia"),
            (respiratory_rate(11), Abnormal, "Bradypnea"),
            (respiratory_rate(12), Normal, "Normal"),
            (respiratory_rate(24), Normal, "Normal"),
            (respiratory_rate(25), Abnormal, "Tachypnea"),
        ];

        for (vitals, status, label) in cases {
            let expected = (status, label);
            assert_eq!(only_finding(vitals.clone()), expected, "{vitals:?}");
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let vitals = VitalsSnapshot {
            temperature: Some(95.0),
            heart_rate: Some(130),
            respiratory_rate: Some(8),
            pain_level: Some(5),
            ..blood_pressure(85, 55)
        };
        let first = evaluate(&vitals);
        assert_eq!(first, evaluate(&vitals));
        assert_eq!(format_analysis(&first), format_analysis(&evaluate(&vitals)));

        let labels: Vec<&str> = first.iter().map(|finding| finding.label).collect();
        assert_eq!(
            labels,
            ["Hypothermia", "Hypotension", "Tachycardia", "Bradypnea", "Moderate pain"]
        );
    }
}
