use super::domain::{CareerId, Teacher, TeacherInput, Training, TrainingInput};

/// Fixed floor for the number of hours of any training.
pub const MINIMUM_TRAINING_HOURS: i64 = 30;

/// Local, recoverable rejection of user input. Never reaches the remote store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("training hours must be at least {minimum}, got {actual}")]
    InsufficientHours { minimum: i64, actual: i64 },
    #[error("training hours must be at most {maximum}, got {actual}")]
    ExcessiveHours { maximum: i64, actual: i64 },
    #[error("a {0} must be selected first")]
    MissingSelection(&'static str),
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Accepts a career name when it has visible characters; returns it trimmed.
pub fn validate_name(value: &str) -> Result<String, ValidationError> {
    required(value, "career name")
}

/// Validates every training field, reporting the first failure in form order.
pub fn validate_training(input: &TrainingInput) -> Result<Training, ValidationError> {
    let name = required(&input.name, "training name")?;

    if input.hours < MINIMUM_TRAINING_HOURS {
        return Err(ValidationError::InsufficientHours {
            minimum: MINIMUM_TRAINING_HOURS,
            actual: input.hours,
        });
    }
    let hours = u32::try_from(input.hours).map_err(|_| ValidationError::ExcessiveHours {
        maximum: i64::from(u32::MAX),
        actual: input.hours,
    })?;

    let duration = required(&input.duration, "training duration")?;
    let period = required(&input.period, "training period")?;
    let kind = required(&input.kind, "training type")?;

    Ok(Training::from_validated(name, hours, duration, period, kind))
}

/// Builds a teacher record from form input. Only the name and career are mandatory.
pub fn validate_teacher(
    career_id: &CareerId,
    input: &TeacherInput,
) -> Result<Teacher, ValidationError> {
    let name = required(&input.name, "teacher name")?;
    if career_id.0.trim().is_empty() {
        return Err(ValidationError::MissingSelection("career"));
    }

    Ok(Teacher {
        id: None,
        career_id: career_id.clone(),
        name,
        cedula: input.cedula.trim().to_string(),
        formation: input.formation.trim().to_string(),
        program: input.program.trim().to_string(),
        status: input.status.trim().to_string(),
        period: input.period.trim().to_string(),
        sequence: None,
    })
}

pub fn validate_month(month: u32) -> Result<u32, ValidationError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ValidationError::InvalidMonth(month))
    }
}
