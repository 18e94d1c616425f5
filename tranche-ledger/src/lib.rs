pub mod access;
pub mod cap;
pub mod config;
pub mod control_list;
pub mod corporate_actions;
pub mod documents;
pub mod holds;
pub mod ledger;
pub mod locks;
pub mod pause;
pub mod snapshot;
pub mod storage;
pub mod token;
pub mod traits;

// Re-export the main types for convenience
pub use access::AccessControl;
pub use cap::Cap;
pub use config::{PartitionMode, SecurityKind, TokenConfig, TokenConfigBuilder};
pub use control_list::{ControlList, ControlListType};
pub use corporate_actions::{
    CorporateActions, CouponFor, CouponRecord, DividendFor, DividendRecord, VotingFor,
    VotingRecord,
};
pub use documents::{Document, DocumentRegistry};
pub use holds::{HoldBook, HoldEntry, HoldParams};
pub use ledger::PartitionedLedger;
pub use locks::{LockBook, LockEntry};
pub use pause::Pause;
pub use snapshot::SnapshotEngine;
pub use storage::{export_state_json, load_state, save_state, StateStoreError};
pub use token::{SecurityToken, TransactionContext};
pub use traits::{CapCheck, ComplianceChecker, PauseState, RoleChecker};
