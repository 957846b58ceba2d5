//! Notification sink port.
//!
//! Delivery and storage of notifications is an external collaborator's job;
//! the engine only ever calls this one primitive.

use canopy_types::AccountId;

/// What a notification is about. Consumers route and render by category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotifyCategory {
    RankPromotion,
    RankDemotion,
    /// Rank-bonus cap reached, partially applied, or cleared.
    BonusCap,
    RankBonus,
    Commission,
}

impl NotifyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyCategory::RankPromotion => "rank_promotion",
            NotifyCategory::RankDemotion => "rank_demotion",
            NotifyCategory::BonusCap => "bonus_cap",
            NotifyCategory::RankBonus => "rank_bonus",
            NotifyCategory::Commission => "commission",
        }
    }
}

/// The single notification primitive. Implementations must not fail the
/// caller: a lost notification is never a reason to abort a cascade.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        account: AccountId,
        category: NotifyCategory,
        title: &str,
        message: &str,
        icon: &str,
        data: serde_json::Value,
    );
}
