//! Loading patient records from the dashboard's JSON.

use handoff_core::{AssistantError, PatientRecord};
use serde_json::Value;

/// Parse and validate one patient record from a JSON string.
pub fn parse_patient_str(json: &str) -> Result<PatientRecord, AssistantError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| AssistantError::Parse(err.to_string()))?;
    parse_patient_value(&value)
}

/// Parse and validate one patient record from a `serde_json::Value`.
///
/// Older records carry `age`, `gender` and `maritalStatus` at the top level
/// instead of under `demographics`; those are used when the nested block
/// leaves a field empty.
pub fn parse_patient_value(value: &Value) -> Result<PatientRecord, AssistantError> {
    if !value.is_object() {
        return Err(AssistantError::Parse(
            "expected a JSON object for the patient record".to_string(),
        ));
    }

    let mut patient: PatientRecord = serde_json::from_value(value.clone())
        .map_err(|err| AssistantError::Parse(err.to_string()))?;

    let demographics = &mut patient.demographics;
    if demographics.age.is_none() {
        demographics.age = value
            .get("age")
            .and_then(Value::as_u64)
            .and_then(|age| u32::try_from(age).ok());
    }
    if demographics.gender.is_none() {
        demographics.gender = flat_string(value, "gender");
    }
    if demographics.marital_status.is_none() {
        demographics.marital_status = flat_string(value, "maritalStatus");
    }

    patient.validate()?;
    Ok(patient)
}

/// Parse a JSON array of patient records, failing on the first bad entry.
pub fn parse_patients_str(json: &str) -> Result<Vec<PatientRecord>, AssistantError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| AssistantError::Parse(err.to_string()))?;
    let entries = value.as_array().ok_or_else(|| {
        AssistantError::Parse("expected a JSON array of patient records".to_string())
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_patient_value(entry).map_err(|err| match err {
                AssistantError::Parse(msg) => {
                    AssistantError::Parse(format!("entry {index}: {msg}"))
                }
                AssistantError::InvalidPatient(msg) => {
                    AssistantError::InvalidPatient(format!("entry {index}: {msg}"))
                }
                other => other,
            })
        })
        .collect()
}

fn flat_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_demographics_win_over_flat_fields() {
        let patient = parse_patient_value(&json!({
            "id": "p-3",
            "name": "Maria Garcia",
            "room": "ORTHO-4",
            "primaryDiagnosis": "Hip fracture",
            "riskLevel": "high",
            "acuityLevel": 3,
            "age": 81,
            "gender": "Female",
            "demographics": { "age": 82 }
        }))
        .unwrap();
        assert_eq!(patient.demographics.age, Some(82));
        assert_eq!(patient.demographics.gender.as_deref(), Some("Female"));
        assert_eq!(patient.demographics.marital_status, None);
    }

    #[test]
    fn rejects_out_of_range_acuity_and_blank_identity() {
        let bad_acuity = json!({
            "id": "p-3", "name": "A", "room": "1",
            "primaryDiagnosis": "x", "riskLevel": "low", "acuityLevel": 7
        });
        assert!(matches!(
            parse_patient_value(&bad_acuity),
            Err(AssistantError::Parse(_))
        ));

        let blank_name = json!({
            "id": "p-3", "name": " ", "room": "1",
            "primaryDiagnosis": "x", "riskLevel": "low", "acuityLevel": 2
        });
        assert!(matches!(
            parse_patient_value(&blank_name),
            Err(AssistantError::InvalidPatient(_))
        ));
    }

    #[test]
    fn array_errors_name_the_entry() {
        let err = parse_patients_str(r#"[{"id": "p-1"}]"#).unwrap_err();
        assert!(err.to_string().contains("entry 0"));
        assert!(parse_patients_str(r#"{"id": "p-1"}"#).is_err());
    }
}
