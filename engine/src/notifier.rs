//! Notification sink that logs through `tracing`.
//!
//! The real delivery pipeline is an external collaborator; the daemon runs
//! with this sink so every rank change and payout still leaves a trace.

use canopy_store::{Notifier, NotifyCategory};
use canopy_types::AccountId;

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        account: AccountId,
        category: NotifyCategory,
        title: &str,
        message: &str,
        _icon: &str,
        data: serde_json::Value,
    ) {
        tracing::info!(
            %account,
            category = category.as_str(),
            title,
            message,
            %data,
            "notification"
        );
    }
}
