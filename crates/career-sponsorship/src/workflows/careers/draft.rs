use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{Career, Training, TrainingInput};
use super::repository::{CareerStore, StoreError};
use super::validation::{validate_name, validate_training, ValidationError};

/// Lifecycle of a single career draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    Empty,
    Drafting(Career),
    Committed(Career),
    Cancelled,
}

impl DraftState {
    pub const fn label(&self) -> &'static str {
        match self {
            DraftState::Empty => "empty",
            DraftState::Drafting(_) => "drafting",
            DraftState::Committed(_) => "committed",
            DraftState::Cancelled => "cancelled",
        }
    }
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The draft and its pending trainings were thrown away.
    Discarded,
    /// The confirmation gate declined; the draft is untouched.
    Kept,
    /// No draft was active.
    NothingToCancel,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no career draft is active; create a career first")]
    NoActiveDraft,
    #[error("a career draft is already in progress")]
    DraftInProgress,
    #[error("must add at least one training before saving")]
    NoTrainings,
    #[error("failed to save career: {0}")]
    Store(#[from] StoreError),
}

/// Two-phase career creation: the name first, then trainings, then a single
/// commit to the remote store.
///
/// The builder is the only owner of the draft record; callers can read it
/// through [`CareerDraftBuilder::draft`] but every mutation goes through the
/// transitions below.
pub struct CareerDraftBuilder<S> {
    store: Arc<S>,
    state: DraftState,
}

pub(crate) const CANCEL_PROMPT: &str =
    "Cancel the career draft? All trainings added so far will be lost.";

impl<S> CareerDraftBuilder<S>
where
    S: CareerStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: DraftState::Empty,
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// Draft under construction, if any.
    pub fn draft(&self) -> Option<&Career> {
        match &self.state {
            DraftState::Drafting(career) => Some(career),
            _ => None,
        }
    }

    pub fn create(&mut self, name: &str) -> Result<&Career, DraftError> {
        if matches!(self.state, DraftState::Drafting(_)) {
            return Err(DraftError::DraftInProgress);
        }
        let name = validate_name(name)?;

        info!(career = %name, "career draft created");
        self.state = DraftState::Drafting(Career::draft(name));
        self.draft().ok_or(DraftError::NoActiveDraft)
    }

    pub fn add_training(&mut self, input: &TrainingInput) -> Result<&Training, DraftError> {
        let DraftState::Drafting(career) = &mut self.state else {
            return Err(DraftError::NoActiveDraft);
        };
        let training = validate_training(input)?;

        debug!(career = %career.name, training = training.name(), "training added to draft");
        career.trainings.push(training);
        career.trainings.last().ok_or(DraftError::NoActiveDraft)
    }

    /// Removes a pending training. Out-of-range indexes are ignored.
    pub fn remove_training(&mut self, index: usize) -> Option<Training> {
        let DraftState::Drafting(career) = &mut self.state else {
            return None;
        };
        if index >= career.trainings.len() {
            return None;
        }

        let removed = career.trainings.remove(index);
        debug!(career = %career.name, training = removed.name(), "training removed from draft");
        Some(removed)
    }

    /// Pushes the draft to the remote store. The state only advances once the
    /// store has accepted the career.
    pub fn commit(&mut self) -> Result<&Career, DraftError> {
        let draft = match &self.state {
            DraftState::Drafting(career) => career,
            _ => return Err(DraftError::NoActiveDraft),
        };
        if draft.trainings.is_empty() {
            return Err(DraftError::NoTrainings);
        }

        let saved = match self.store.create(draft.clone()) {
            Ok(saved) if saved.id.is_none() => {
                warn!(career = %draft.name, "store accepted career without assigning an id");
                return Err(StoreError::Rejected {
                    status: 502,
                    message: None,
                }
                .into());
            }
            Ok(saved) => saved,
            Err(err) => {
                warn!(career = %draft.name, error = %err, "career commit rejected by store");
                return Err(err.into());
            }
        };

        info!(
            career = %saved.name,
            id = saved.id.as_ref().map(|id| id.0.as_str()).unwrap_or_default(),
            trainings = saved.trainings.len(),
            "career draft committed"
        );
        self.state = DraftState::Committed(saved);
        match &self.state {
            DraftState::Committed(career) => Ok(career),
            _ => Err(DraftError::NoActiveDraft),
        }
    }

    /// Discards the draft. When trainings are pending, `confirm` is asked first
    /// and the draft survives if it answers `false`.
    pub fn cancel<F>(&mut self, confirm: F) -> CancelOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        let DraftState::Drafting(career) = &self.state else {
            return CancelOutcome::NothingToCancel;
        };

        if !career.trainings.is_empty() && !confirm(CANCEL_PROMPT) {
            return CancelOutcome::Kept;
        }

        info!(career = %career.name, "career draft cancelled");
        self.state = DraftState::Cancelled;
        CancelOutcome::Discarded
    }
}
