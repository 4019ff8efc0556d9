use thiserror::Error;

/// Errors from user record store operations (trait definitions live in
/// askgate-core, implementations in askgate-infra).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    #[error("duplicate key: '{0}'")]
    DuplicateKey(String),
}

/// Errors from user provisioning and quota operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid email: '{0}'")]
    InvalidEmail(String),

    /// A record lost a duplicate-insert race and then the re-fetch missed too.
    /// Indicates a store-level anomaly, surfaced as an internal error.
    #[error("record for '{0}' vanished after insert race")]
    RecordVanished(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from the external answer generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("answer generation timed out")]
    Timeout,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("provider returned an empty answer")]
    EmptyAnswer,
}

/// Errors from the ask orchestration flow.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    #[error("daily question limit reached")]
    QuotaExceeded,

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
