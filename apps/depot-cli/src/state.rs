//! # Application State
//!
//! The open database plus the actor supplied on the command line.
//!
//! ## Gating
//! ```text
//! state.require(Permission::RecordSale, "record sales")
//!      │
//!      ├── no --user/--role ─────────► CliError::MissingActor
//!      ├── role lacks permission ────► CliError::Forbidden
//!      ▼
//! Ok(ActorContext)  → passed into the engine call for attribution
//! ```

use tracing::warn;

use depot_core::{ActorContext, Permission};
use depot_db::Database;

use crate::error::CliError;

#[derive(Debug)]
pub struct AppState {
    db: Database,
    actor: Option<ActorContext>,
}

impl AppState {
    pub fn new(db: Database, actor: Option<ActorContext>) -> Self {
        AppState { db, actor }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn actor(&self) -> Option<ActorContext> {
        self.actor
    }

    /// The actor, if its role allows `permission`.
    pub fn require(&self, permission: Permission, action: &str) -> Result<ActorContext, CliError> {
        let actor = self.actor.ok_or(CliError::MissingActor)?;

        if !actor.can(permission) {
            warn!(
                user_id = actor.user_id,
                role = %actor.role,
                ?permission,
                "Command refused for role"
            );
            return Err(CliError::forbidden(action));
        }

        Ok(actor)
    }
}
