pub mod amount;
pub mod error;
pub mod events;
pub mod id;
pub mod reason;
pub mod roles;
pub mod time;

// Re-export the main types for convenience
pub use amount::Amount;
pub use error::TokenError;
pub use events::TokenEvent;
pub use id::{AccountId, PartitionId, SnapshotId};
pub use reason::{TransferCheck, TransferCheckCode};
pub use roles::Role;
pub use time::Timestamp;
