//! Narrow capability interfaces between the ledger services.
//!
//! The facade composes concrete services, but the transfer algorithm only
//! sees these traits, so each check stays independently testable and
//! replaceable.

use tranche_core::{AccountId, Amount, PartitionId, Role, TokenError};

/// Role-membership check used by every privileged operation.
pub trait RoleChecker {
    fn has_role(&self, role: Role, account: &AccountId) -> bool;

    /// Fail with [`TokenError::AccountHasNoRole`] unless the account holds
    /// the role.
    fn require_role(&self, role: Role, account: &AccountId) -> Result<(), TokenError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(TokenError::AccountHasNoRole {
                account: *account,
                role,
            })
        }
    }
}

/// The pause switch consulted by every state-changing operation.
pub trait PauseState {
    fn is_paused(&self) -> bool;

    /// Fail with [`TokenError::TokenIsPaused`] when paused.
    fn require_not_paused(&self) -> Result<(), TokenError> {
        if self.is_paused() {
            Err(TokenError::TokenIsPaused)
        } else {
            Ok(())
        }
    }
}

/// The control-list compliance predicate.
pub trait ComplianceChecker {
    /// Whether the account passes the control-list predicate.
    fn is_compliant(&self, account: &AccountId) -> bool;

    /// Fail with [`TokenError::AccountIsBlocked`] unless compliant.
    fn require_compliant(&self, account: &AccountId) -> Result<(), TokenError> {
        if self.is_compliant(account) {
            Ok(())
        } else {
            Err(TokenError::AccountIsBlocked { account: *account })
        }
    }
}

/// Supply-ceiling check applied on the issuance path.
pub trait CapCheck {
    /// Validate the post-issuance totals against the configured ceilings.
    fn validate_issuance(
        &self,
        new_total_supply: Amount,
        partition: PartitionId,
        new_partition_supply: Amount,
    ) -> Result<(), TokenError>;
}
