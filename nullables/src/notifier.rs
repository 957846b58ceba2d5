//! Recording notifier — captures every notification for assertions.

use canopy_store::{Notifier, NotifyCategory};
use canopy_types::AccountId;
use std::sync::Mutex;

/// One captured notification.
#[derive(Clone, Debug)]
pub struct NotificationRecord {
    pub account: AccountId,
    pub category: NotifyCategory,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub data: serde_json::Value,
}

/// A [`Notifier`] that records everything it is told, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    records: Mutex<Vec<NotificationRecord>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Notifications sent to one account in one category.
    pub fn for_account(
        &self,
        account: AccountId,
        category: NotifyCategory,
    ) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.account == account && r.category == category)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        account: AccountId,
        category: NotifyCategory,
        title: &str,
        message: &str,
        icon: &str,
        data: serde_json::Value,
    ) {
        self.records.lock().unwrap().push(NotificationRecord {
            account,
            category,
            title: title.to_string(),
            message: message.to_string(),
            icon: icon.to_string(),
            data,
        });
    }
}
