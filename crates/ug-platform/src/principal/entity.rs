//! Principal Entity
//!
//! A user account. Role decides whether the principal can administer others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Principal role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular user, sees only their own record
    #[default]
    Basic,
    /// Administrator, may list all users, mutate them, and impersonate
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Basic => "BASIC",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BASIC" => Some(Role::Basic),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub suspended_at: Option<DateTime<Utc>>,
    pub last_logged_at: Option<DateTime<Utc>>,

    /// One-way password digest; never leaves the server
    #[serde(skip_serializing, default)]
    pub password_digest: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn suspend(&mut self, at: DateTime<Utc>) {
        self.suspended_at = Some(at);
    }

    pub fn activate(&mut self) {
        self.suspended_at = None;
    }
}

/// Fields for a principal that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
            suspended_at: None,
            last_logged_at: None,
            password_digest: "$argon2id$secret".to_string(),
        }
    }

    #[test]
    fn test_digest_is_not_serialized() {
        let json = serde_json::to_value(principal()).unwrap();
        assert!(json.get("passwordDigest").is_none());
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["suspendedAt"], serde_json::Value::Null);
        assert_eq!(json["lastLoggedAt"], serde_json::Value::Null);
    }

    #[test]
    fn test_suspend_and_activate() {
        let mut p = principal();
        let at = Utc::now();
        p.suspend(at);
        assert_eq!(p.suspended_at, Some(at));
        p.activate();
        assert_eq!(p.suspended_at, None);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(Role::Basic.as_str()), Some(Role::Basic));
        assert_eq!(Role::parse("admin"), None);
    }
}
