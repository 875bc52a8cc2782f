// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Normalization of raw authority labels into a principal's authority set.

use std::collections::BTreeSet;

use super::roles::{Authority, AuthorityGroup};

/// Maps raw labels to canonical authorities.
///
/// Labels are uppercased and given the `ROLE_` prefix; blank labels are
/// dropped. When nothing is left, the default group is granted so an
/// authenticated principal never ends up with an empty authority set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityMapper {
    default_group: AuthorityGroup,
}

impl AuthorityMapper {
    pub fn new(default_group: AuthorityGroup) -> Self {
        Self { default_group }
    }

    pub fn default_group(&self) -> AuthorityGroup {
        self.default_group
    }

    pub fn map<I, S>(&self, labels: I) -> BTreeSet<Authority>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut authorities: BTreeSet<Authority> = labels
            .into_iter()
            .filter_map(|label| Authority::parse(label.as_ref()))
            .collect();

        if authorities.is_empty() {
            authorities.insert(self.default_group.authority());
        }
        authorities
    }

    pub fn map_groups<I>(&self, groups: I) -> BTreeSet<Authority>
    where
        I: IntoIterator<Item = AuthorityGroup>,
    {
        self.map(groups.into_iter().map(|group| group.label()))
    }
}

impl Default for AuthorityMapper {
    fn default() -> Self {
        Self::new(AuthorityGroup::default())
    }
}
