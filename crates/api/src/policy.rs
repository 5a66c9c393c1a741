//! Declarative role authorization policy.
//!
//! The source system scattered role→route checks across layout components;
//! here the whole map lives in one table consulted by the guard
//! middleware. Paths are matched by prefix, relative to the API root.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal roles, supplied by the external auth/profile provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access.
    Admin,
    /// Fee billing, payments, posting, budgets.
    Bursar,
    /// Enrollment records.
    Registrar,
    /// Results entry.
    Tutor,
    /// Own clearance and results views.
    Student,
}

impl Role {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "bursar" => Some(Self::Bursar),
            "registrar" => Some(Self::Registrar),
            "tutor" => Some(Self::Tutor),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Bursar => "bursar",
            Self::Registrar => "registrar",
            Self::Tutor => "tutor",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path prefixes a role may reach, relative to the API root. `"/"` grants
/// everything.
#[must_use]
pub const fn allowed_prefixes(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &["/"],
        Role::Bursar => &[
            "/students",
            "/billings",
            "/payments",
            "/bursaries",
            "/budget-periods",
            "/results",
            "/audit-logs",
        ],
        Role::Registrar => &["/students"],
        Role::Tutor => &["/results", "/students"],
        Role::Student => &["/students"],
    }
}

/// Returns true if the role may reach the given path.
#[must_use]
pub fn is_allowed(role: Role, path: &str) -> bool {
    allowed_prefixes(role)
        .iter()
        .any(|prefix| *prefix == "/" || path.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_reaches_everything() {
        assert!(is_allowed(Role::Admin, "/budget-periods"));
        assert!(is_allowed(Role::Admin, "/anything/at/all"));
    }

    #[test]
    fn test_bursar_covers_finance_and_posting() {
        assert!(is_allowed(Role::Bursar, "/payments"));
        assert!(is_allowed(Role::Bursar, "/results/abc/post"));
        assert!(is_allowed(Role::Bursar, "/audit-logs/export.csv"));
    }

    #[test]
    fn test_registrar_is_limited_to_students() {
        assert!(is_allowed(Role::Registrar, "/students"));
        assert!(!is_allowed(Role::Registrar, "/payments"));
        assert!(!is_allowed(Role::Registrar, "/budget-periods"));
    }

    #[test]
    fn test_tutor_enters_results_only() {
        assert!(is_allowed(Role::Tutor, "/results/abc/entries"));
        assert!(!is_allowed(Role::Tutor, "/audit-logs"));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Admin,
            Role::Bursar,
            Role::Registrar,
            Role::Tutor,
            Role::Student,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("headmaster"), None);
    }
}
