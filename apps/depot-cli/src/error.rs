//! # CLI Error Type
//!
//! Unified error type for command handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command handler  Result<Outcome, CliError>                             │
//! │       │                                                                 │
//! │       ├── config  ─── ConfigError ──────────┐                          │
//! │       ├── gating  ─── Forbidden / NoActor ──┼──► CliError ──► Outcome  │
//! │       ├── store   ─── DbError ──────────────┘        (printed as JSON) │
//! │       ▼                                                                 │
//! │  Ok(Outcome)                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Storage failures are logged by the `DbError -> Outcome` conversion; the
//! printed outcome still carries the cause.

use thiserror::Error;

use depot_core::{CoreError, Outcome, OutcomeCode};
use depot_db::DbError;

use crate::config::ConfigError;

/// Error returned from command handlers.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    /// `--user` without `--role` or the reverse.
    #[error("{0}")]
    Usage(String),

    /// The command needs an actor and none was supplied.
    #[error("This command needs --user and --role.")]
    MissingActor,

    /// The actor's role does not allow the command.
    #[error("Your role is not allowed to {action}.")]
    Forbidden { action: String },
}

impl CliError {
    pub fn forbidden(action: impl Into<String>) -> Self {
        CliError::Forbidden {
            action: action.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Db(DbError::Core(err))
    }
}

impl From<CliError> for Outcome {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Db(e) => Outcome::from(e),
            CliError::Forbidden { action } => Outcome::unauthorized(&action),
            CliError::MissingActor => Outcome::failure(OutcomeCode::Unauthorized, err.to_string()),
            CliError::Config(_) | CliError::Usage(_) => {
                Outcome::failure(OutcomeCode::InvalidInput, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_outcome() {
        let outcome = Outcome::from(CliError::forbidden("record sales"));
        assert!(!outcome.success);
        assert_eq!(outcome.code, OutcomeCode::Unauthorized);
        assert_eq!(
            outcome.reason.as_deref(),
            Some("Your role is not allowed to record sales.")
        );
    }

    #[test]
    fn test_core_error_keeps_available() {
        let err = CliError::from(CoreError::InsufficientStock {
            location: depot_core::StockLocation::Warehouse,
            available: 30,
            requested: 50,
        });
        let outcome = Outcome::from(err);
        assert_eq!(outcome.code, OutcomeCode::InsufficientStock);
        assert_eq!(outcome.available, Some(30));
    }

    #[test]
    fn test_config_error_is_invalid_input() {
        let outcome = Outcome::from(CliError::from(ConfigError::InvalidValue(
            "DEPOT_MAX_CONNECTIONS".to_string(),
        )));
        assert_eq!(outcome.code, OutcomeCode::InvalidInput);
        assert_eq!(
            outcome.reason.as_deref(),
            Some("Invalid value for DEPOT_MAX_CONNECTIONS")
        );
    }
}
