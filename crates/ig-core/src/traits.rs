//! Core traits shared by the model, domain, and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trait for entities addressed by a stable external id
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Trait for entities with timestamps (created_at, updated_at)
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities guarded by optimistic locking
pub trait Lockable {
    fn lock_version(&self) -> i32;
}

/// Base trait for domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

/// Acting role attached to every request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student attached to the grade record
    Student,
    /// Supervising lecturer (GV)
    Supervisor,
    /// Department-head reviewer (BCN)
    Bcn,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Supervisor => "supervisor",
            Role::Bcn => "bcn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "supervisor" => Some(Role::Supervisor),
            "bcn" => Some(Role::Bcn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User context for role checks in contracts and services
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> &str;
    fn role(&self) -> Role;

    fn is_supervisor(&self) -> bool {
        self.role() == Role::Supervisor
    }

    fn is_reviewer(&self) -> bool {
        self.role() == Role::Bcn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Supervisor, Role::Bcn] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }
}
