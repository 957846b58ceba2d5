//! Abstract storage traits for the canopy compensation engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the workspace depends only on the traits, plus the
//! record structs they persist. The notification sink port lives here too:
//! like the stores, it is an external collaborator the engine only ever
//! talks to through a trait.

pub mod account;
pub mod commission;
pub mod error;
pub mod ledger;
pub mod meta;
pub mod notify;
pub mod run_log;
pub mod stake;

pub use account::{AccountRecord, AccountStore};
pub use commission::{CommissionRecord, CommissionStore, ReportBuckets};
pub use error::StoreError;
pub use ledger::{EntryKind, LedgerEntry, TransactionStore};
pub use meta::MetaStore;
pub use notify::{Notifier, NotifyCategory};
pub use run_log::{RunLogStore, RunRecord};
pub use stake::{StakeRecord, StakeStore};
