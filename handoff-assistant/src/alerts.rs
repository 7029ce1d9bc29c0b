//! Unprompted alerts raised when a bound patient's vitals change.

use handoff_core::{PatientRecord, VitalsSnapshot};
use tracing::warn;

use crate::vitals::{self, SEVERE_PAIN_FROM};

/// Alert sentences for every alert-worthy reading, in fixed order. The
/// conditions are independent; several can fire for one snapshot.
pub fn vitals_alerts(patient: &PatientRecord) -> Vec<String> {
    let recorded = &patient.vitals;
    let name = &patient.name;
    let mut alerts = Vec::new();

    if let Some(pain) = recorded.pain_level.filter(|pain| *pain >= SEVERE_PAIN_FROM) {
        alerts.push(format!(
            "Severe pain detected for {name} ({pain}/10). Immediate intervention recommended."
        ));
    }

    if let Some(temp) = recorded.temperature {
        let reading = vitals::format_temperature(temp);
        if vitals::is_fever(temp) {
            alerts.push(format!(
                "Fever detected for {name} ({reading}). Consider antipyretics and infection workup."
            ));
        }
        if vitals::is_hypothermia(temp) {
            alerts.push(format!(
                "Hypothermia detected for {name} ({reading}). Warming measures needed, assess circulation."
            ));
        }
    }

    if let Some(bp) = recorded.blood_pressure {
        let reading = vitals::format_blood_pressure(bp);
        if vitals::is_hypertension(bp) {
            alerts.push(format!(
                "High blood pressure detected for {name} ({reading}). Monitor closely, consider antihypertensives."
            ));
        }
        if vitals::is_hypotension(bp) {
            alerts.push(format!(
                "Low blood pressure detected for {name} ({reading}). Assess fluid status, consider IV fluids."
            ));
        }
    }

    if let Some(rate) = recorded.heart_rate {
        if vitals::is_tachycardia(rate) {
            alerts.push(format!(
                "Tachycardia detected for {name} ({rate} bpm). Assess for causes (pain, fever, anxiety, dehydration)."
            ));
        }
        if vitals::is_bradycardia(rate) {
            alerts.push(format!(
                "Bradycardia detected for {name} ({rate} bpm). Monitor for symptoms, assess medications."
            ));
        }
    }

    if let Some(saturation) = recorded.oxygen_saturation.filter(|ox| vitals::is_low_oxygen(*ox)) {
        alerts.push(format!(
            "Low oxygen saturation detected for {name} ({saturation}%). Consider oxygen therapy, assess respiratory status."
        ));
    }

    alerts
}

/// Per-session alert state. Remembers the snapshot it last alerted on so an
/// unchanged snapshot never alerts twice.
#[derive(Debug, Default, Clone)]
pub struct AlertMonitor {
    last_seen: Option<VitalsSnapshot>,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts for a changed snapshot; empty when the snapshot matches the
    /// previous evaluation.
    pub fn on_vitals_changed(&mut self, patient: &PatientRecord) -> Vec<String> {
        if self.last_seen.as_ref() == Some(&patient.vitals) {
            return Vec::new();
        }
        self.last_seen = Some(patient.vitals.clone());

        let alerts = vitals_alerts(patient);
        for alert in &alerts {
            warn!(patient_id = %patient.id, alert = %alert, "proactive vitals alert");
        }
        alerts
    }

    /// Forget the last snapshot, e.g. when the session is rebound.
    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}
