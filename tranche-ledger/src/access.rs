//! Role-membership registry, the gate for all privileged operations.

use crate::traits::RoleChecker;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tranche_core::{AccountId, Role, TokenError};

/// Role-membership registry.
///
/// Only an account holding the administrative role of a given role (always
/// [`Role::Admin`]) may grant or revoke it. Membership checks themselves are
/// unprivileged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessControl {
    members: HashMap<Role, HashSet<AccountId>>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `role` to `account`. The caller must hold the role's admin
    /// role.
    pub fn grant_role(
        &mut self,
        caller: &AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<(), TokenError> {
        self.require_role(role.admin_role(), caller)?;
        self.grant_unchecked(role, account);
        Ok(())
    }

    /// Revoke `role` from `account`. The caller must hold the role's admin
    /// role.
    pub fn revoke_role(
        &mut self,
        caller: &AccountId,
        role: Role,
        account: &AccountId,
    ) -> Result<(), TokenError> {
        self.require_role(role.admin_role(), caller)?;
        if let Some(members) = self.members.get_mut(&role) {
            members.remove(account);
        }
        Ok(())
    }

    /// Grant without an authorization check. Used while constructing a token
    /// from its initial role-assignment list.
    pub(crate) fn grant_unchecked(&mut self, role: Role, account: AccountId) {
        self.members.entry(role).or_default().insert(account);
    }

    /// Number of members of a role.
    pub fn role_member_count(&self, role: Role) -> usize {
        self.members.get(&role).map_or(0, |m| m.len())
    }
}

impl RoleChecker for AccessControl {
    fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.members
            .get(&role)
            .is_some_and(|members| members.contains(account))
    }
}
