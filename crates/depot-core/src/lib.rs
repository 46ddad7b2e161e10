//! # depot-core: Pure Inventory Logic for Depot
//!
//! This crate holds everything about goods distribution that can be expressed
//! without touching the database: domain types, money math, validation,
//! roles and credentials, and the outcome shape handed to the UI.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Depot Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI collaborator (depot-cli, desktop, ...)          │   │
//! │  │   renders Outcome { success, reason, available } verbatim       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain function calls                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   auth    │  │ validation│  │   │
//! │  │   │   Good    │  │   Money   │  │   Role    │  │   rules   │  │   │
//! │  │   │  Branch   │  │   Rate    │  │ Credential│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-db (Database Layer)                    │   │
//! │  │      SQLite schema, distribution & sales engines, reports       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain rows, requests and receipts
//! - [`money`] - Integer-cent money and basis-point rates
//! - [`auth`] - Roles, permissions, credentials and the actor context
//! - [`error`] - Domain error taxonomy
//! - [`outcome`] - The `{success, reason, available}` shape the UI renders
//! - [`validation`] - Input checks run before any store access

pub mod auth;
pub mod error;
pub mod money;
pub mod outcome;
pub mod types;
pub mod validation;

pub use auth::{ActorContext, Credential, Permission, Role};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use outcome::{Outcome, OutcomeCode};
pub use types::*;

/// Fixed local date-time format for every history row.
///
/// Lexicographic order of these strings equals chronological order, which the
/// reports rely on when they `ORDER BY` the raw column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Expected margin applied to distributed stock, in basis points (20%).
///
/// Display-only: logged and returned with a distribution receipt, never
/// persisted or reconciled against actual sales.
pub const EXPECTED_MARGIN_BPS: u32 = 2000;

/// Label used for a distribution whose source is the central warehouse.
pub const WAREHOUSE_LABEL: &str = "Warehouse";

/// Longest name accepted for goods, branches and users.
pub const MAX_NAME_LEN: usize = 200;
