use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Deref;

// AccountId uniquely identifies a token holder, operator or escrow.
// It is a 32 byte long identifier, resembling a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format as a hex string with a prefix of the first 6 bytes
        let prefix = hex::encode(&self.0[0..6]);
        write!(f, "acct:{}", prefix)
    }
}

impl Ord for AccountId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for AccountId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        AccountId([0; 32])
    }
}

impl Deref for AccountId {
    type Target = [u8; 32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AccountId {
    /// The all-zero account. Used as the "no account" sentinel, e.g. for the
    /// operator field of a self-initiated transfer event.
    pub const NULL: Self = AccountId([0; 32]);

    pub fn new(id: [u8; 32]) -> Self {
        AccountId(id)
    }

    /// Create an AccountId from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    /// Get a reference to the internal bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the all-zero sentinel account
    pub fn is_null(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Derive a deterministic AccountId from seed byte strings
    pub fn derive(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        let hash: [u8; 32] = hasher.finalize().into();
        AccountId(hash)
    }
}

// PartitionId names a sub-ledger (tranche) of a token. The zero partition is
// reserved and invalid for every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionId([u8; 32]);

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = hex::encode(&self.0[0..6]);
        write!(f, "part:{}", prefix)
    }
}

impl Ord for PartitionId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for PartitionId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for PartitionId {
    fn default() -> Self {
        PartitionId::DEFAULT
    }
}

impl Deref for PartitionId {
    type Target = [u8; 32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartitionId {
    /// The reserved, invalid zero partition.
    pub const ZERO: Self = PartitionId([0; 32]);

    /// The well-known default partition. This is the only valid partition of
    /// a single-partition token.
    pub const DEFAULT: Self = PartitionId({
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        bytes
    });

    pub fn new(id: [u8; 32]) -> Self {
        PartitionId(id)
    }

    /// Get a reference to the internal bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the reserved zero partition
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Create a PartitionId from a short ASCII label, right-padded with
    /// zeroes. Labels longer than 32 bytes are truncated.
    pub fn from_label(label: &str) -> Self {
        let mut bytes = [0u8; 32];
        let src = label.as_bytes();
        let len = src.len().min(32);
        bytes[..len].copy_from_slice(&src[..len]);
        PartitionId(bytes)
    }
}

/// Identifier of a balance snapshot. Snapshots are 1-indexed; id 0 is the
/// reserved "no snapshot" sentinel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SnapshotId(pub u64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot:{}", self.0)
    }
}

impl SnapshotId {
    /// The "no snapshot" sentinel.
    pub const NULL: Self = SnapshotId(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_display() {
        let id = AccountId::new([0xab; 32]);
        assert_eq!(format!("{}", id), "acct:abababababab");
    }

    #[test]
    fn test_account_id_null() {
        assert!(AccountId::NULL.is_null());
        assert!(!AccountId::new([1; 32]).is_null());
        assert_eq!(AccountId::default(), AccountId::NULL);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = AccountId::derive(&[b"issuer", b"1"]);
        let b = AccountId::derive(&[b"issuer", b"1"]);
        let c = AccountId::derive(&[b"issuer", b"2"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_null());
    }

    #[test]
    fn test_partition_constants() {
        assert!(PartitionId::ZERO.is_zero());
        assert!(!PartitionId::DEFAULT.is_zero());
        assert_eq!(PartitionId::DEFAULT.bytes()[31], 1);
    }

    #[test]
    fn test_partition_from_label() {
        let p = PartitionId::from_label("tranche-a");
        assert!(!p.is_zero());
        assert_eq!(&p.bytes()[..9], b"tranche-a");
        assert_eq!(p, PartitionId::from_label("tranche-a"));
    }

    #[test]
    fn test_snapshot_id_sentinel() {
        assert!(SnapshotId::NULL.is_null());
        assert!(!SnapshotId(1).is_null());
        assert!(SnapshotId(1) < SnapshotId(2));
    }
}
