use chrono::NaiveDate;
use thiserror::Error;

/// Custom error type for compensation engine operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("No metric configuration available for cargo {cargo_id} in {month}")]
    ConfigurationMissing { cargo_id: String, month: NaiveDate },

    #[error("No compensation plan covers employee {employee_id} in {month}")]
    PlanNotFound { employee_id: String, month: NaiveDate },

    #[error("Payout {payout_id} changed status before the approval could be recorded")]
    ConcurrentApprovalConflict { payout_id: String },

    #[error("{entity} {id} was modified concurrently, refresh and retry")]
    ConcurrentUpdateConflict { entity: &'static str, id: String },

    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),

    #[error("Invalid state transition for {entity}: {from} -> {to}")]
    InvalidStateTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository operation failed: {0}")]
    Repository(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Overlapping window: {0}")]
    OverlappingWindow(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Settings(err.to_string())
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
