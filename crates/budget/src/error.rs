use thiserror::Error;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Structural errors from the scenario engine. These abort processing of
/// the current scenario only, never the whole batch.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("budget store is empty")]
    EmptyStore,

    #[error("target category '{0}' not found in budget")]
    CategoryNotFound(String),

    #[error("constraint violation for '{category}': {reason}")]
    ConstraintViolation { category: String, reason: String },

    #[error("invalid value for scenario '{scenario}': {reason}")]
    InvalidScenarioValue { scenario: String, reason: String },
}
