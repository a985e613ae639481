use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Career, CareerId, Teacher, TeacherId, TeacherInput};
use super::repository::{StoreError, TeacherStore};
use super::validation::{validate_teacher, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum TeacherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("career '{0}' has not been saved yet; teachers need a saved career")]
    MissingIdentifier(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Teacher roster operations scoped to committed careers.
pub struct TeacherRegistry<S> {
    store: Arc<S>,
}

impl<S> TeacherRegistry<S>
where
    S: TeacherStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list_all(&self) -> Result<Vec<Teacher>, TeacherError> {
        Ok(self.store.list()?)
    }

    pub fn list_by_career(&self, career: &Career) -> Result<Vec<Teacher>, TeacherError> {
        let career_id = career_id(career)?;
        Ok(self.store.list_by_career(&career_id)?)
    }

    pub fn fetch(&self, id: &TeacherId) -> Result<Teacher, TeacherError> {
        self.store
            .fetch(id)?
            .ok_or(TeacherError::Store(StoreError::NotFound))
    }

    /// Creates a teacher under `career`; the store assigns id and sequence.
    pub fn create(&self, career: &Career, input: &TeacherInput) -> Result<Teacher, TeacherError> {
        let career_id = career_id(career)?;
        let teacher = validate_teacher(&career_id, input)?;

        let created = self.store.create(teacher).map_err(|err| {
            warn!(career = %career.name, error = %err, "teacher create failed");
            err
        })?;
        info!(
            career = %career.name,
            teacher = %created.name,
            sequence = created.sequence.unwrap_or_default(),
            "teacher created"
        );
        Ok(created)
    }

    pub fn update(
        &self,
        id: &TeacherId,
        career: &Career,
        input: &TeacherInput,
    ) -> Result<Teacher, TeacherError> {
        let career_id = career_id(career)?;
        let mut teacher = validate_teacher(&career_id, input)?;
        let existing = self.fetch(id)?;
        teacher.id = Some(id.clone());
        teacher.sequence = existing.sequence;

        let updated = self.store.update(id, teacher).map_err(|err| {
            warn!(teacher = %id, error = %err, "teacher update failed");
            err
        })?;
        info!(teacher = %id, "teacher updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &TeacherId) -> Result<(), TeacherError> {
        self.store.delete(id).map_err(|err| {
            warn!(teacher = %id, error = %err, "teacher delete failed");
            err
        })?;
        info!(teacher = %id, "teacher deleted");
        Ok(())
    }
}

fn career_id(career: &Career) -> Result<CareerId, TeacherError> {
    career
        .id
        .clone()
        .ok_or_else(|| TeacherError::MissingIdentifier(career.name.clone()))
}
