// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authority groups and canonical authority labels.

use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Prefix carried by every authority label on the wire and in route checks.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Authority groups a credential can belong to.
///
/// ## Groups
///
/// - `Admin` - User administration (register, list, inspect users)
/// - `User` - Regular catalog user, the default for new accounts
/// - `Viewer` - Read-only catalog access
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthorityGroup {
    /// User administration
    Admin,
    /// Regular catalog user
    User,
    /// Read-only access
    Viewer,
}

impl AuthorityGroup {
    pub const ALL: [AuthorityGroup; 3] = [
        AuthorityGroup::Admin,
        AuthorityGroup::User,
        AuthorityGroup::Viewer,
    ];

    /// Bare label, without the role prefix.
    pub fn label(&self) -> &'static str {
        match self {
            AuthorityGroup::Admin => "ADMIN",
            AuthorityGroup::User => "USER",
            AuthorityGroup::Viewer => "VIEWER",
        }
    }

    /// Description stored alongside the group record.
    pub fn description(&self) -> &'static str {
        match self {
            AuthorityGroup::Admin => "Administrator with user management rights",
            AuthorityGroup::User => "Regular tour catalog user",
            AuthorityGroup::Viewer => "Read-only access to the tour catalog",
        }
    }

    /// Parse a bare label (case-insensitive).
    pub fn from_label(label: &str) -> Option<AuthorityGroup> {
        Self::ALL
            .into_iter()
            .find(|group| group.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn authority(&self) -> Authority {
        Authority::Group(*self)
    }
}

impl Default for AuthorityGroup {
    fn default() -> Self {
        AuthorityGroup::User
    }
}

impl std::fmt::Display for AuthorityGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized authority attached to a principal.
///
/// Labels that do not name a known group are kept as `Unknown` so they stay
/// visible in logs and responses, but they never satisfy an authority check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Authority {
    Group(AuthorityGroup),
    Unknown(String),
}

impl Authority {
    /// Normalize a raw label: trim, uppercase, strip one `ROLE_` prefix.
    ///
    /// Returns `None` for labels that are blank once normalized.
    pub fn parse(raw: &str) -> Option<Authority> {
        let upper = raw.trim().to_uppercase();
        let bare = upper.strip_prefix(ROLE_PREFIX).unwrap_or(&upper);
        if bare.is_empty() {
            return None;
        }

        Some(match AuthorityGroup::from_label(bare) {
            Some(group) => Authority::Group(group),
            None => Authority::Unknown(bare.to_string()),
        })
    }

    pub fn group(&self) -> Option<AuthorityGroup> {
        match self {
            Authority::Group(group) => Some(*group),
            Authority::Unknown(_) => None,
        }
    }

    fn bare_label(&self) -> &str {
        match self {
            Authority::Group(group) => group.label(),
            Authority::Unknown(label) => label,
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ROLE_PREFIX}{}", self.bare_label())
    }
}

impl Serialize for Authority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(AuthorityGroup::from_label("admin"), Some(AuthorityGroup::Admin));
        assert_eq!(AuthorityGroup::from_label("USER"), Some(AuthorityGroup::User));
        assert_eq!(AuthorityGroup::from_label(" Viewer "), Some(AuthorityGroup::Viewer));
        assert_eq!(AuthorityGroup::from_label("root"), None);
    }

    #[test]
    fn default_group_is_user() {
        assert_eq!(AuthorityGroup::default(), AuthorityGroup::User);
    }

    #[test]
    fn parse_canonicalizes_prefix_and_case() {
        assert_eq!(Authority::parse("admin"), Some(Authority::Group(AuthorityGroup::Admin)));
        assert_eq!(Authority::parse("ROLE_admin"), Some(Authority::Group(AuthorityGroup::Admin)));
        assert_eq!(Authority::parse("role_viewer"), Some(Authority::Group(AuthorityGroup::Viewer)));
        assert_eq!(Authority::parse("  ROLE_USER "), Some(Authority::Group(AuthorityGroup::User)));
    }

    #[test]
    fn parse_rejects_blank_labels() {
        assert_eq!(Authority::parse(""), None);
        assert_eq!(Authority::parse("   "), None);
        assert_eq!(Authority::parse("ROLE_"), None);
    }

    #[test]
    fn unknown_labels_fail_closed() {
        let typo = Authority::parse("admn").unwrap();
        assert_eq!(typo, Authority::Unknown("ADMN".to_string()));
        assert_eq!(typo.group(), None);
        assert_eq!(typo.to_string(), "ROLE_ADMN");
    }

    #[test]
    fn display_uses_role_prefix() {
        assert_eq!(AuthorityGroup::Admin.authority().to_string(), "ROLE_ADMIN");
        assert_eq!(AuthorityGroup::User.authority().to_string(), "ROLE_USER");
    }

    #[test]
    fn serializes_as_canonical_label() {
        let json = serde_json::to_string(&AuthorityGroup::Viewer.authority()).unwrap();
        assert_eq!(json, r#""ROLE_VIEWER""#);
        let json = serde_json::to_string(&AuthorityGroup::Admin).unwrap();
        assert_eq!(json, r#""ADMIN""#);
    }
}
