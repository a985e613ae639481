use super::domain::{Career, CareerId, Teacher, TeacherId};

/// Remote store for careers and their trainings.
pub trait CareerStore: Send + Sync {
    /// Persist a draft career. The returned value carries the assigned id.
    fn create(&self, career: Career) -> Result<Career, StoreError>;
    fn list(&self) -> Result<Vec<Career>, StoreError>;
    fn update(&self, id: &CareerId, career: Career) -> Result<Career, StoreError>;
    fn delete(&self, id: &CareerId) -> Result<(), StoreError>;
}

/// Remote store for teachers. Creation assigns both id and sequence number.
pub trait TeacherStore: Send + Sync {
    fn create(&self, teacher: Teacher) -> Result<Teacher, StoreError>;
    fn list(&self) -> Result<Vec<Teacher>, StoreError>;
    fn list_by_career(&self, career_id: &CareerId) -> Result<Vec<Teacher>, StoreError>;
    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, StoreError>;
    fn update(&self, id: &TeacherId, teacher: Teacher) -> Result<Teacher, StoreError>;
    fn delete(&self, id: &TeacherId) -> Result<(), StoreError>;
}

const DUPLICATE_CAREER_MESSAGE: &str = "The same career cannot be saved twice.";
const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

/// Failure reported by a remote store call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("a career named '{0}' already exists")]
    Duplicate(String),
    #[error("record not found")]
    NotFound,
    #[error("remote store rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Best-effort human message: the server payload wins, a 500 means the record
    /// already exists, anything else falls back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Duplicate(_) => DUPLICATE_CAREER_MESSAGE.to_string(),
            StoreError::NotFound => "The requested record no longer exists.".to_string(),
            StoreError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            StoreError::Rejected { status: 500, .. } => DUPLICATE_CAREER_MESSAGE.to_string(),
            StoreError::Rejected { .. } | StoreError::Unavailable(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}
