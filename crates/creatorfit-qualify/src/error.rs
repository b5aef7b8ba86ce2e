use creatorfit_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QualifyError {
    /// A required signal is missing or malformed, or the creator is in a
    /// state that cannot be qualified. Nothing was written.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("creator {0} not found")]
    CreatorNotFound(i64),

    #[error("signals provider failed: {0}")]
    Signals(String),

    #[error("persistence failed: {0}")]
    Persistence(#[source] DbError),
}

impl From<DbError> for QualifyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotQualifiable(status) => {
                QualifyError::InvalidInput(format!("creator in status '{status}' cannot be qualified"))
            }
            other => QualifyError::Persistence(other),
        }
    }
}
