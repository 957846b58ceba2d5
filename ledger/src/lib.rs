//! Currency ledger for the canopy engine.
//!
//! Every credit and debit anywhere in the engine routes through
//! [`CurrencyLedger`]: one append-only transaction entry plus an update of
//! the materialized per-account balance. The ledger is the source of truth;
//! balances are a cache that must always equal the signed entry sum.

pub mod error;
pub mod ledger;
pub mod routing;

pub use error::LedgerError;
pub use ledger::CurrencyLedger;
pub use routing::RewardRouting;
