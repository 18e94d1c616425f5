use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured reason code returned by the transfer and redemption dry-run
/// predicates.
///
/// The numeric codes follow the ERC-1066/ERC-1594 convention (0x5x range)
/// and are part of the compatibility surface. The order in which the codes
/// are produced matches the order the mutating paths apply their
/// validations, so a dry run always reports the same failure the real call
/// would surface first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferCheckCode {
    /// The operation would succeed.
    Success,
    /// The token is paused.
    TransfersPaused,
    /// The partition is the zero partition, disallowed by the partition
    /// mode, or not held by the source.
    InvalidPartition,
    /// The caller is neither the holder nor an authorized operator.
    InvalidOperator,
    /// The operator fails the control-list predicate.
    OperatorBlocked,
    /// The recipient fails the control-list predicate.
    ToBlocked,
    /// The source fails the control-list predicate.
    FromBlocked,
    /// The source's transferable balance on the partition is insufficient.
    InsufficientBalance,
    /// The source is the null account.
    FromAccountNull,
    /// The destination is the null account.
    ToAccountNull,
}

impl TransferCheckCode {
    /// The wire byte for this code.
    pub fn code(&self) -> u8 {
        match self {
            TransferCheckCode::Success => 0x51,
            TransferCheckCode::TransfersPaused => 0x54,
            TransferCheckCode::InvalidPartition => 0x59,
            TransferCheckCode::InvalidOperator => 0x58,
            TransferCheckCode::OperatorBlocked => 0x5A,
            TransferCheckCode::ToBlocked => 0x57,
            TransferCheckCode::FromBlocked => 0x56,
            TransferCheckCode::InsufficientBalance => 0x52,
            TransferCheckCode::FromAccountNull => 0x55,
            TransferCheckCode::ToAccountNull => 0x53,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == TransferCheckCode::Success
    }
}

impl fmt::Display for TransferCheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferCheckCode::Success => "success",
            TransferCheckCode::TransfersPaused => "transfers-paused",
            TransferCheckCode::InvalidPartition => "invalid-partition",
            TransferCheckCode::InvalidOperator => "invalid-operator",
            TransferCheckCode::OperatorBlocked => "operator-blocked",
            TransferCheckCode::ToBlocked => "to-blocked",
            TransferCheckCode::FromBlocked => "from-blocked",
            TransferCheckCode::InsufficientBalance => "insufficient-balance",
            TransferCheckCode::FromAccountNull => "from-account-null",
            TransferCheckCode::ToAccountNull => "to-account-null",
        };
        write!(f, "{} (0x{:02x})", name, self.code())
    }
}

/// Result of a transfer or redemption dry run: the boolean verdict together
/// with the first reason code the mutating path would report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCheck {
    pub allowed: bool,
    pub code: TransferCheckCode,
}

impl TransferCheck {
    pub fn ok() -> Self {
        TransferCheck {
            allowed: true,
            code: TransferCheckCode::Success,
        }
    }

    pub fn fail(code: TransferCheckCode) -> Self {
        TransferCheck {
            allowed: false,
            code,
        }
    }
}

impl From<TransferCheckCode> for TransferCheck {
    fn from(code: TransferCheckCode) -> Self {
        if code.is_success() {
            TransferCheck::ok()
        } else {
            TransferCheck::fail(code)
        }
    }
}
