//! Immutable token configuration captured at construction.

use crate::control_list::ControlListType;
use serde::{Deserialize, Serialize};
use tranche_core::{AccountId, Amount, PartitionId, Role};

/// Whether a token operates on a single well-known partition or on
/// arbitrary nonzero partitions. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionMode {
    /// Only [`PartitionId::DEFAULT`] is valid; partition-scoped operator
    /// features are disabled.
    Single,
    /// Any nonzero partition id is valid; partition-scoped operator and
    /// controller features are enabled.
    Multi,
}

/// The kind of security the token models. Informational metadata; both
/// kinds expose the full corporate-action surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityKind {
    Equity,
    Bond,
}

/// Immutable configuration of a token instance.
///
/// This is the input surface of the external factory/deployment
/// collaborator: it assembles the mode flags, initial ceilings and the
/// initial role-assignment list, and the constructor applies them once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Short ticker-style symbol.
    pub symbol: String,
    /// Human-readable name.
    pub name: String,
    /// Display decimals. Metadata only; ledger arithmetic is unscaled.
    pub decimals: u8,
    pub kind: SecurityKind,
    pub partition_mode: PartitionMode,
    pub control_list_type: ControlListType,
    /// Whether controller (force) operations start enabled.
    pub controllable: bool,
    /// Initial global supply ceiling; zero means uncapped.
    pub max_supply: Amount,
    /// Initial per-partition supply ceilings.
    pub max_supply_by_partition: Vec<(PartitionId, Amount)>,
    /// Roles granted before the token accepts its first operation.
    pub initial_roles: Vec<(Role, AccountId)>,
}

impl TokenConfig {
    /// Start building a configuration with the defaults: equity,
    /// single-partition, deny-list, controllable, uncapped.
    pub fn builder(symbol: impl Into<String>, name: impl Into<String>) -> TokenConfigBuilder {
        TokenConfigBuilder {
            config: TokenConfig {
                symbol: symbol.into(),
                name: name.into(),
                decimals: 0,
                kind: SecurityKind::Equity,
                partition_mode: PartitionMode::Single,
                control_list_type: ControlListType::Deny,
                controllable: true,
                max_supply: Amount::ZERO,
                max_supply_by_partition: Vec::new(),
                initial_roles: Vec::new(),
            },
        }
    }
}

/// Builder for [`TokenConfig`].
#[derive(Debug, Clone)]
pub struct TokenConfigBuilder {
    config: TokenConfig,
}

impl TokenConfigBuilder {
    pub fn decimals(mut self, decimals: u8) -> Self {
        self.config.decimals = decimals;
        self
    }

    pub fn kind(mut self, kind: SecurityKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn partition_mode(mut self, mode: PartitionMode) -> Self {
        self.config.partition_mode = mode;
        self
    }

    pub fn control_list_type(mut self, list_type: ControlListType) -> Self {
        self.config.control_list_type = list_type;
        self
    }

    pub fn controllable(mut self, controllable: bool) -> Self {
        self.config.controllable = controllable;
        self
    }

    pub fn max_supply(mut self, max: Amount) -> Self {
        self.config.max_supply = max;
        self
    }

    pub fn max_supply_by_partition(mut self, partition: PartitionId, max: Amount) -> Self {
        self.config.max_supply_by_partition.push((partition, max));
        self
    }

    /// Grant a role as part of construction.
    pub fn grant(mut self, role: Role, account: AccountId) -> Self {
        self.config.initial_roles.push((role, account));
        self
    }

    pub fn build(self) -> TokenConfig {
        self.config
    }
}
