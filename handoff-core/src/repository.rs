//! Patient store capability. The assistant only ever receives
//! `PatientRecord` values; storage sits behind this trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{AssistantError, PatientRecord, VitalsSnapshot};

/// CRUD access to patient records.
pub trait PatientRepository: Send + Sync {
    fn get(&self, id: &str) -> Result<PatientRecord, AssistantError>;

    fn list(&self) -> Result<Vec<PatientRecord>, AssistantError>;

    /// Insert or replace a record. The record is validated first.
    fn upsert(&self, patient: PatientRecord) -> Result<(), AssistantError>;

    fn remove(&self, id: &str) -> Result<PatientRecord, AssistantError>;

    /// Replace the vitals of an existing patient and return the updated record.
    fn update_vitals(
        &self,
        id: &str,
        vitals: VitalsSnapshot,
    ) -> Result<PatientRecord, AssistantError>;
}

/// Process-local store, ordered by patient id.
#[derive(Debug, Default)]
pub struct InMemoryPatientRepository {
    patients: RwLock<BTreeMap<String, PatientRecord>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(
        patients: impl IntoIterator<Item = PatientRecord>,
    ) -> Result<Self, AssistantError> {
        let repo = Self::new();
        for patient in patients {
            repo.upsert(patient)?;
        }
        Ok(repo)
    }
}

fn poisoned(_: impl std::fmt::Display) -> AssistantError {
    AssistantError::Repository("patient store lock poisoned".into())
}

impl PatientRepository for InMemoryPatientRepository {
    fn get(&self, id: &str) -> Result<PatientRecord, AssistantError> {
        let patients = self.patients.read().map_err(poisoned)?;
        patients
            .get(id)
            .cloned()
            .ok_or_else(|| AssistantError::PatientNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<PatientRecord>, AssistantError> {
        let patients = self.patients.read().map_err(poisoned)?;
        Ok(patients.values().cloned().collect())
    }

    fn upsert(&self, patient: PatientRecord) -> Result<(), AssistantError> {
        patient.validate()?;
        let mut patients = self.patients.write().map_err(poisoned)?;
        patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<PatientRecord, AssistantError> {
        let mut patients = self.patients.write().map_err(poisoned)?;
        patients
            .remove(id)
            .ok_or_else(|| AssistantError::PatientNotFound(id.to_string()))
    }

    fn update_vitals(
        &self,
        id: &str,
        vitals: VitalsSnapshot,
    ) -> Result<PatientRecord, AssistantError> {
        let mut patients = self.patients.write().map_err(poisoned)?;
        let patient = patients
            .get_mut(id)
            .ok_or_else(|| AssistantError::PatientNotFound(id.to_string()))?;

        let previous = std::mem::replace(&mut patient.vitals, vitals);
        if let Err(err) = patient.validate() {
            patient.vitals = previous;
            return Err(err);
        }
        Ok(patient.clone())
    }
}
