//! Email allow-list role resolution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::RoleOverrides;

const ADMIN_EMAILS: &[&str] = &[
    "manager@tradingsol.com",
    "pricing10@tradingsol.com",
    "pricing2@tradingsol.com",
    "pricing@tradingsol.com",
];

const COMMERCIAL_EMAILS: &[&str] = &[
    "sales@tradingsolutions.com",
    "sales1@tradingsolutions.com",
    "sales2@tradingsolutions.com",
    "sales3@tradingsolutions.com",
    "sales4@tradingsolutions.com",
    "sales5@tradingsolutions.com",
    "bds@tradingsolutions.com",
];

const INSIDE_EMAILS: &[&str] = &["insidesales@tradingsolutions.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Commercial,
    Inside,
}

impl Role {
    /// Whether this role may fill in and submit advance payment requests.
    pub fn can_submit_requests(&self) -> bool {
        matches!(self, Role::Admin | Role::Commercial)
    }
}

/// Fixed allow-lists, checked in admin → commercial → inside order.
#[derive(Debug, Clone)]
pub struct RoleDirectory {
    admin: Vec<String>,
    commercial: Vec<String>,
    inside: Vec<String>,
}

impl Default for RoleDirectory {
    fn default() -> Self {
        Self::with_overrides(&RoleOverrides::default())
    }
}

impl RoleDirectory {
    pub fn new(admin: Vec<String>, commercial: Vec<String>, inside: Vec<String>) -> Self {
        Self {
            admin,
            commercial,
            inside,
        }
    }

    pub fn with_overrides(overrides: &RoleOverrides) -> Self {
        let pick = |custom: &Option<Vec<String>>, builtin: &[&str]| {
            custom
                .clone()
                .unwrap_or_else(|| builtin.iter().map(|e| e.to_string()).collect())
        };
        Self::new(
            pick(&overrides.admin, ADMIN_EMAILS),
            pick(&overrides.commercial, COMMERCIAL_EMAILS),
            pick(&overrides.inside, INSIDE_EMAILS),
        )
    }

    /// Exact, case-sensitive lookup. Never fails; unknown emails get `None`.
    pub fn resolve(&self, email: &str) -> Option<Role> {
        let listed = |list: &[String]| list.iter().any(|entry| entry == email);

        if listed(&self.admin) {
            Some(Role::Admin)
        } else if listed(&self.commercial) {
            Some(Role::Commercial)
        } else if listed(&self.inside) {
            Some(Role::Inside)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_admin_resolves() {
        let roles = RoleDirectory::default();
        assert_eq!(roles.resolve("pricing@tradingsol.com"), Some(Role::Admin));
    }

    #[test]
    fn test_resolution_is_case_sensitive() {
        let roles = RoleDirectory::default();
        assert_eq!(roles.resolve("Pricing@tradingsol.com"), None);
        assert_eq!(roles.resolve(" pricing@tradingsol.com"), None);
    }

    #[test]
    fn test_unknown_email_has_no_role() {
        let roles = RoleDirectory::default();
        assert_eq!(roles.resolve("someone@example.com"), None);
        assert_eq!(roles.resolve(""), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let roles = RoleDirectory::default();
        for email in ["sales1@tradingsolutions.com", "nobody@x.com", "insidesales@tradingsolutions.com"] {
            let first = roles.resolve(email);
            for _ in 0..5 {
                assert_eq!(roles.resolve(email), first);
            }
        }
    }

    #[test]
    fn test_overrides_replace_only_named_roles() {
        let overrides = RoleOverrides {
            admin: Some(vec!["boss@x.com".to_string()]),
            commercial: None,
            inside: Some(vec![]),
        };
        let roles = RoleDirectory::with_overrides(&overrides);

        assert_eq!(roles.resolve("boss@x.com"), Some(Role::Admin));
        assert_eq!(roles.resolve("pricing@tradingsol.com"), None);
        assert_eq!(roles.resolve("sales2@tradingsolutions.com"), Some(Role::Commercial));
        assert_eq!(roles.resolve("insidesales@tradingsolutions.com"), None);
    }

    #[test]
    fn test_only_admin_and_commercial_submit() {
        assert!(Role::Admin.can_submit_requests());
        assert!(Role::Commercial.can_submit_requests());
        assert!(!Role::Inside.can_submit_requests());
    }
}
