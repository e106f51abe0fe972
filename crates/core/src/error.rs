use pms_types::TextError;

/// Why a set of patient fields was rejected.
///
/// Variants are checked in declaration order; the first failing field wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Patient ID must be a positive integer")]
    InvalidId,
    #[error("Name is required (min 2 characters)")]
    Name(#[source] TextError),
    #[error("Age must be between 0 and 150")]
    AgeOutOfRange(i64),
    #[error("Gender is required")]
    MissingGender,
    #[error("Disease/Condition is required")]
    MissingCondition,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Patient with ID {0} not found")]
    NotFound(u32),
    #[error("Patient ID {0} already exists")]
    DuplicateId(u32),
    #[error("{0} is already in the queue")]
    AlreadyQueued(String),
    #[error("No patients in queue")]
    QueueEmpty,
    #[error("No activities to undo")]
    NoActivities,

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write snapshot file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read snapshot file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove snapshot file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize snapshot: {0}")]
    Deserialization(serde_json::Error),
    #[error("snapshot store lock poisoned")]
    StoreLockPoisoned,
}

/// Broad classification of a [`PatientError`], used by callers that need to pick a
/// transport-level status without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Empty,
    Persistence,
}

impl PatientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PatientError::InvalidInput(_) | PatientError::Validation(_) => ErrorKind::Validation,
            PatientError::NotFound(_) => ErrorKind::NotFound,
            PatientError::DuplicateId(_) | PatientError::AlreadyQueued(_) => ErrorKind::Conflict,
            PatientError::QueueEmpty | PatientError::NoActivities => ErrorKind::Empty,
            PatientError::StorageDirCreation(_)
            | PatientError::FileWrite(_)
            | PatientError::FileRead(_)
            | PatientError::FileRemove(_)
            | PatientError::Serialization(_)
            | PatientError::Deserialization(_)
            | PatientError::StoreLockPoisoned => ErrorKind::Persistence,
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_api_wording() {
        assert_eq!(
            PatientError::from(ValidationError::Name(TextError::Empty)).to_string(),
            "Name is required (min 2 characters)"
        );
        assert_eq!(
            PatientError::NotFound(1001).to_string(),
            "Patient with ID 1001 not found"
        );
        assert_eq!(
            PatientError::AlreadyQueued("Ahmed Khan".into()).to_string(),
            "Ahmed Khan is already in the queue"
        );
    }

    #[test]
    fn test_kind_classifies_variants() {
        assert_eq!(PatientError::DuplicateId(5).kind(), ErrorKind::Conflict);
        assert_eq!(PatientError::QueueEmpty.kind(), ErrorKind::Empty);
        assert_eq!(
            PatientError::FileRead(std::io::Error::other("boom")).kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            PatientError::from(ValidationError::MissingGender).kind(),
            ErrorKind::Validation
        );
    }
}
