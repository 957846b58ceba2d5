//! Nullable infrastructure — deterministic substitutes for the real store,
//! clock, and notification sink, used throughout the workspace's tests.

pub mod clock;
pub mod notifier;
pub mod store;

pub use clock::NullClock;
pub use notifier::{NotificationRecord, RecordingNotifier};
pub use store::MemoryStore;
