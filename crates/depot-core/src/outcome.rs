//! # Outcome DTO
//!
//! The structured result a UI collaborator renders after every core call.
//!
//! Operations themselves return tagged `Result`s; the `Outcome` is built at
//! the edge so the UI never has to match on Rust error types.
//!
//! ## Serialization
//! ```json
//! { "success": false,
//!   "code": "INSUFFICIENT_STOCK",
//!   "reason": "Insufficient stock in warehouse: available 30, requested 50.",
//!   "available": 30 }
//! ```
//! `reason` and `available` are omitted when absent; a success outcome may
//! carry a `data` payload (the receipt or rows).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCode {
    Ok,
    /// Non-positive quantity, empty or negative fields.
    InvalidInput,
    /// Good, branch, user or inventory row absent.
    NotFound,
    /// Row exists but holds too little.
    InsufficientStock,
    /// Case-insensitive name collision.
    DuplicateName,
    /// Bad credentials or the actor's role does not allow the operation.
    Unauthorized,
    /// Connection or transaction error; the store is unchanged.
    StorageFailure,
}

/// `{success, reason?, available?}` plus a code and optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Outcome {
    pub success: bool,
    pub code: OutcomeCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub data: Option<serde_json::Value>,
}

impl Outcome {
    /// A bare success.
    pub fn ok() -> Self {
        Outcome {
            success: true,
            code: OutcomeCode::Ok,
            reason: None,
            available: None,
            data: None,
        }
    }

    /// A success carrying a serialized payload.
    ///
    /// A payload that fails to serialize is dropped rather than failing an
    /// operation that already committed.
    pub fn with_data<T: Serialize>(data: &T) -> Self {
        Outcome {
            data: serde_json::to_value(data).ok(),
            ..Outcome::ok()
        }
    }

    /// A failure with a reason for the UI.
    pub fn failure(code: OutcomeCode, reason: impl Into<String>) -> Self {
        Outcome {
            success: false,
            code,
            reason: Some(reason.into()),
            available: None,
            data: None,
        }
    }

    /// Role gating failure.
    pub fn unauthorized(action: &str) -> Self {
        Outcome::failure(
            OutcomeCode::Unauthorized,
            format!("Your role is not allowed to {}.", action),
        )
    }
}

impl From<&CoreError> for Outcome {
    fn from(err: &CoreError) -> Self {
        let code = match err {
            CoreError::InvalidQuantity | CoreError::Validation(_) | CoreError::Credential(_) => {
                OutcomeCode::InvalidInput
            }
            CoreError::GoodNotFound(_)
            | CoreError::BranchNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::NoSourceInventory { .. }
            | CoreError::NoInventoryRecord { .. } => OutcomeCode::NotFound,
            CoreError::InsufficientStock { .. } => OutcomeCode::InsufficientStock,
            CoreError::DuplicateName { .. } => OutcomeCode::DuplicateName,
            CoreError::InvalidCredentials => OutcomeCode::Unauthorized,
        };

        Outcome {
            available: err.available(),
            ..Outcome::failure(code, err.to_string())
        }
    }
}

impl From<CoreError> for Outcome {
    fn from(err: CoreError) -> Self {
        Outcome::from(&err)
    }
}
