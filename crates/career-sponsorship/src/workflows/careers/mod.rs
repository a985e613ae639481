//! Careers, their trainings and the teachers assigned to them.
//!
//! New careers are assembled locally by [`CareerDraftBuilder`] and only reach
//! the remote store on commit. Committed careers are edited through
//! [`TrainingRegistry`], which always reloads the authoritative list after a
//! successful write.

pub mod domain;
pub mod draft;
pub mod registry;
pub mod repository;
pub mod router;
pub mod teachers;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Career, CareerId, Teacher, TeacherId, TeacherInput, Training, TrainingInput};
pub use draft::{CancelOutcome, CareerDraftBuilder, DraftError, DraftState};
pub use registry::{RegistryError, TrainingRegistry};
pub use repository::{CareerStore, StoreError, TeacherStore};
pub use router::career_router;
pub use teachers::{TeacherError, TeacherRegistry};
pub use validation::{
    validate_month, validate_name, validate_teacher, validate_training, ValidationError,
    MINIMUM_TRAINING_HOURS,
};
