//! # Roles, Permissions and Credentials
//!
//! The core trusts an externally supplied [`ActorContext`] for attribution.
//! Gating is the caller's job: [`Role::allows`] is a pure table the CLI (or
//! any other collaborator) consults before invoking an operation.
//!
//! ## Permission Table
//! ```text
//! ┌──────────────────────┬───────┬───────┬───────┐
//! │ Permission           │ ADMIN │ STAFF │ USER  │
//! ├──────────────────────┼───────┼───────┼───────┤
//! │ ViewGoods            │   ✓   │   ✓   │   ✓   │
//! │ AddGoods             │   ✓   │   ✓   │   ✓   │
//! │ Distribute           │   ✓   │   ✓   │   ✓   │
//! │ RecordSale           │   ✓   │   ✓   │       │
//! │ RecordImport         │   ✓   │   ✓   │       │
//! │ ViewReports          │   ✓   │   ✓   │       │
//! │ ManageGoods          │   ✓   │       │       │
//! │ ManageBranches       │   ✓   │       │       │
//! │ ManageUsers          │   ✓   │       │       │
//! └──────────────────────┴───────┴───────┴───────┘
//! ```
//!
//! ## Credentials
//! Stored passwords are either bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) or
//! plaintext rows written by older builds. The prefix is sniffed exactly once,
//! in [`Credential::from_stored`]; everything after that dispatches on the tag.
//! `Legacy` is a compatibility shim: a successful legacy login re-hashes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};

// =============================================================================
// Role
// =============================================================================

/// Closed set of roles. Stored as `ADMIN` / `STAFF` / `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
    User,
}

impl Role {
    /// Resolves the stored column value.
    ///
    /// Unknown values resolve to [`Role::User`], the least privileged role.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Role::User)
    }

    /// Column value written to `users.role`.
    pub fn as_stored(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::User => "USER",
        }
    }

    /// Whether this role may perform `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Admin => true,
            Role::Staff => matches!(
                permission,
                ViewGoods | AddGoods | Distribute | RecordSale | RecordImport | ViewReports
            ),
            Role::User => matches!(permission, ViewGoods | AddGoods | Distribute),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stored())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            "USER" => Ok(Role::User),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["ADMIN".into(), "STAFF".into(), "USER".into()],
            }),
        }
    }
}

// =============================================================================
// Permission
// =============================================================================

/// Something a caller may want to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ViewGoods,
    AddGoods,
    Distribute,
    RecordSale,
    RecordImport,
    ViewReports,
    /// Rename or delete goods.
    ManageGoods,
    ManageBranches,
    ManageUsers,
}

// =============================================================================
// Actor Context
// =============================================================================

/// Who is performing an operation.
///
/// Passed explicitly into every mutating engine call and written to the
/// history rows for attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActorContext {
    pub user_id: i64,
    pub role: Role,
}

impl ActorContext {
    pub fn new(user_id: i64, role: Role) -> Self {
        ActorContext { user_id, role }
    }

    /// Shorthand for `self.role.allows(permission)`.
    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Default bcrypt cost for newly hashed passwords.
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// A stored password, resolved once from the `users.password` column.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// bcrypt hash.
    Hashed(String),
    /// Plaintext from an older build.
    Legacy(String),
}

impl Credential {
    /// Tags the raw column value.
    pub fn from_stored(stored: &str) -> Self {
        if stored.starts_with("$2") {
            Credential::Hashed(stored.to_string())
        } else {
            Credential::Legacy(stored.to_string())
        }
    }

    /// Hashes a new password.
    pub fn hash(password: &str, cost: u32) -> Result<Self, CoreError> {
        bcrypt::hash(password, cost)
            .map(Credential::Hashed)
            .map_err(|e| CoreError::Credential(e.to_string()))
    }

    /// Checks `password` against this credential.
    ///
    /// A malformed hash never verifies.
    pub fn verify(&self, password: &str) -> bool {
        match self {
            Credential::Hashed(hash) => bcrypt::verify(password, hash).unwrap_or(false),
            Credential::Legacy(plain) => plain == password,
        }
    }

    /// True for plaintext credentials.
    pub fn needs_rehash(&self) -> bool {
        matches!(self, Credential::Legacy(_))
    }

    /// The value written back to `users.password`.
    pub fn as_stored(&self) -> &str {
        match self {
            Credential::Hashed(s) | Credential::Legacy(s) => s,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Hashed(_) => f.write_str("Credential::Hashed(..)"),
            Credential::Legacy(_) => f.write_str("Credential::Legacy(..)"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_stored_values() {
        assert_eq!(Role::from_stored("ADMIN"), Role::Admin);
        assert_eq!(Role::from_stored("staff"), Role::Staff);
        assert_eq!(Role::from_stored("USER"), Role::User);
        assert_eq!(Role::from_stored("SUPERUSER"), Role::User);
        assert_eq!(Role::Staff.as_stored(), "STAFF");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_permission_table() {
        assert!(Role::Admin.allows(Permission::ManageBranches));
        assert!(Role::Admin.allows(Permission::RecordSale));

        assert!(Role::Staff.allows(Permission::RecordSale));
        assert!(Role::Staff.allows(Permission::RecordImport));
        assert!(Role::Staff.allows(Permission::ViewReports));
        assert!(!Role::Staff.allows(Permission::ManageBranches));
        assert!(!Role::Staff.allows(Permission::ManageUsers));

        assert!(Role::User.allows(Permission::Distribute));
        assert!(Role::User.allows(Permission::AddGoods));
        assert!(Role::User.allows(Permission::ViewGoods));
        assert!(!Role::User.allows(Permission::RecordSale));
        assert!(!Role::User.allows(Permission::ViewReports));
    }

    #[test]
    fn test_role_serializes_as_stored() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_credential_tagging() {
        let hashed = Credential::from_stored("$2b$04$abcdefghijklmnopqrstuu");
        assert!(matches!(hashed, Credential::Hashed(_)));
        assert!(!hashed.needs_rehash());

        let legacy = Credential::from_stored("hunter2");
        assert!(legacy.needs_rehash());
        assert!(legacy.verify("hunter2"));
        assert!(!legacy.verify("hunter3"));
    }

    #[test]
    fn test_hash_and_verify() {
        let credential = Credential::hash("s3cret", 4).unwrap();
        assert!(credential.as_stored().starts_with("$2"));
        assert!(credential.verify("s3cret"));
        assert!(!credential.verify("S3cret"));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let credential = Credential::from_stored("$2-not-a-hash");
        assert!(!credential.verify("anything"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", Credential::Legacy("hunter2".into()));
        assert!(!debug.contains("hunter2"));
    }
}
