//! Allow-list or deny-list of accounts, the compliance gate on transfers
//! and issuance.

use crate::traits::ComplianceChecker;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tranche_core::{AccountId, TokenError};

/// Which side of the list the compliance predicate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlListType {
    /// Members are the only compliant accounts.
    Allow,
    /// Members are the only non-compliant accounts.
    Deny,
}

/// Set of accounts plus the list mode, fixed at creation.
///
/// Members enumerate in insertion order. Removal swap-removes, so it does
/// not preserve the order of the remaining members, but count and
/// membership stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlList {
    list_type: ControlListType,
    members: Vec<AccountId>,
    index: HashMap<AccountId, usize>,
}

impl ControlList {
    pub fn new(list_type: ControlListType) -> Self {
        ControlList {
            list_type,
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn list_type(&self) -> ControlListType {
        self.list_type
    }

    /// Add an account. Adding an existing member is a no-op.
    pub fn add(&mut self, account: AccountId) {
        if self.index.contains_key(&account) {
            return;
        }
        self.index.insert(account, self.members.len());
        self.members.push(account);
    }

    /// Remove an account. Removing a non-member is a no-op. Returns whether
    /// the account was present.
    pub fn remove(&mut self, account: &AccountId) -> bool {
        let Some(position) = self.index.remove(account) else {
            return false;
        };
        self.members.swap_remove(position);
        if let Some(moved) = self.members.get(position) {
            self.index.insert(*moved, position);
        }
        true
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.index.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in the half-open range `[start, end)`. An out-of-range end
    /// fails.
    pub fn members(&self, start: usize, end: usize) -> Result<&[AccountId], TokenError> {
        if start > end || end > self.members.len() {
            return Err(TokenError::InvalidRange {
                start: start as u64,
                end: end as u64,
                len: self.members.len() as u64,
            });
        }
        Ok(&self.members[start..end])
    }
}

impl ComplianceChecker for ControlList {
    fn is_compliant(&self, account: &AccountId) -> bool {
        match self.list_type {
            ControlListType::Allow => self.contains(account),
            ControlListType::Deny => !self.contains(account),
        }
    }
}
