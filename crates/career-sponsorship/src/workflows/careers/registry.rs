use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Career, CareerId, TrainingInput};
use super::repository::{CareerStore, StoreError};
use super::validation::{validate_name, validate_training, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("career '{0}' has not been saved yet and has no identifier")]
    MissingIdentifier(String),
    #[error("career has no training at position {index} (it has {len})")]
    TrainingIndex { index: usize, len: usize },
    #[error("remote update failed: {0}")]
    Store(#[from] StoreError),
    /// The mutation was stored but the career list could not be reloaded.
    #[error("change saved but the career list could not be reloaded: {0}")]
    Refresh(StoreError),
}

/// Edits on committed careers.
///
/// Each mutation works on a copy, pushes it to the store and then reloads the
/// whole list; the cached list is never patched in place.
pub struct TrainingRegistry<S> {
    store: Arc<S>,
    careers: Vec<Career>,
}

impl<S> TrainingRegistry<S>
where
    S: CareerStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            careers: Vec::new(),
        }
    }

    /// Careers as of the last successful reload.
    pub fn careers(&self) -> &[Career] {
        &self.careers
    }

    pub fn find(&self, id: &CareerId) -> Option<&Career> {
        self.careers
            .iter()
            .find(|career| career.id.as_ref() == Some(id))
    }

    pub fn refresh(&mut self) -> Result<&[Career], StoreError> {
        self.careers = self.store.list()?;
        Ok(&self.careers)
    }

    pub fn add_training_to_existing(
        &mut self,
        career: &Career,
        input: &TrainingInput,
    ) -> Result<&[Career], RegistryError> {
        let training = validate_training(input)?;
        let id = committed_id(career)?;

        let mut updated = career.clone();
        updated.trainings.push(training);
        self.push(id, updated, "training added")
    }

    pub fn replace_training_at(
        &mut self,
        career: &Career,
        index: usize,
        input: &TrainingInput,
    ) -> Result<&[Career], RegistryError> {
        let training = validate_training(input)?;
        let id = committed_id(career)?;

        let mut updated = career.clone();
        let len = updated.trainings.len();
        let slot = updated
            .trainings
            .get_mut(index)
            .ok_or(RegistryError::TrainingIndex { index, len })?;
        *slot = training;
        self.push(id, updated, "training replaced")
    }

    pub fn remove_training_at(
        &mut self,
        career: &Career,
        index: usize,
    ) -> Result<&[Career], RegistryError> {
        let id = committed_id(career)?;

        let mut updated = career.clone();
        let len = updated.trainings.len();
        if index >= len {
            return Err(RegistryError::TrainingIndex { index, len });
        }
        updated.trainings.remove(index);
        self.push(id, updated, "training removed")
    }

    pub fn rename_career(&mut self, career: &Career, name: &str) -> Result<&[Career], RegistryError> {
        let name = validate_name(name)?;
        let id = committed_id(career)?;

        let updated = Career {
            name,
            ..career.clone()
        };
        self.push(id, updated, "career renamed")
    }

    pub fn delete_career(&mut self, career: &Career) -> Result<&[Career], RegistryError> {
        let id = committed_id(career)?;

        if let Err(err) = self.store.delete(&id) {
            warn!(career = %career.name, error = %err, "career delete failed");
            return Err(err.into());
        }
        info!(career = %career.name, %id, "career deleted");
        self.reload()
    }

    fn push(
        &mut self,
        id: CareerId,
        updated: Career,
        action: &'static str,
    ) -> Result<&[Career], RegistryError> {
        let name = updated.name.clone();
        if let Err(err) = self.store.update(&id, updated) {
            warn!(career = %name, error = %err, action, "career update failed");
            return Err(err.into());
        }

        info!(career = %name, %id, action, "career updated");
        self.reload()
    }

    fn reload(&mut self) -> Result<&[Career], RegistryError> {
        match self.store.list() {
            Ok(careers) => {
                self.careers = careers;
                Ok(&self.careers)
            }
            Err(err) => {
                warn!(error = %err, "career list reload failed");
                Err(RegistryError::Refresh(err))
            }
        }
    }
}

fn committed_id(career: &Career) -> Result<CareerId, RegistryError> {
    career
        .id
        .clone()
        .ok_or_else(|| RegistryError::MissingIdentifier(career.name.clone()))
}
