use serde::{Deserialize, Serialize};
use std::fmt;

/// The privileged roles recognized by the ledger.
///
/// Every role is administered by [`Role::Admin`]: only admins may grant or
/// revoke membership of any role, including the admin role itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administers all other roles and finalizes the controller feature.
    Admin,
    /// May issue new tokens into partitions.
    Issuer,
    /// May force transfers and redemptions while the token is controllable.
    Controller,
    /// May pause and unpause the token.
    Pauser,
    /// May edit the compliance control list.
    ControlList,
    /// May configure global and per-partition supply caps.
    Cap,
    /// May take manual balance snapshots.
    Snapshot,
    /// May schedule dividends, coupons and voting records.
    CorporateActions,
    /// May attach and remove registry documents.
    Documenter,
    /// May lock holder balances.
    Locker,
}

impl Role {
    /// All roles, in a stable order.
    pub const ALL: [Role; 10] = [
        Role::Admin,
        Role::Issuer,
        Role::Controller,
        Role::Pauser,
        Role::ControlList,
        Role::Cap,
        Role::Snapshot,
        Role::CorporateActions,
        Role::Documenter,
        Role::Locker,
    ];

    /// The role that administers membership of this role.
    pub fn admin_role(&self) -> Role {
        Role::Admin
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Issuer => "issuer",
            Role::Controller => "controller",
            Role::Pauser => "pauser",
            Role::ControlList => "control-list",
            Role::Cap => "cap",
            Role::Snapshot => "snapshot",
            Role::CorporateActions => "corporate-actions",
            Role::Documenter => "documenter",
            Role::Locker => "locker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
