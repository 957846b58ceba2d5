//! Dynamic, bidirectional rank recomputation.

use std::sync::Arc;

use canopy_store::{AccountRecord, AccountStore, Notifier, NotifyCategory};
use canopy_types::{AccountId, TierId};
use serde_json::json;

use crate::{RankError, RankRuleTable};

/// One persisted rank transition.
#[derive(Clone, Debug)]
pub struct RankChange {
    pub account: AccountId,
    pub from: TierId,
    pub to: TierId,
    pub promoted: bool,
}

/// Evaluates the rule table for an account and propagates the consequences
/// upward.
///
/// Rank is always the highest tier whose volume, direct-count, and
/// structural conditions hold — demotions propagate exactly like
/// promotions, since a child's change can make or break the structural
/// prerequisite its sponsor depends on.
#[derive(Clone)]
pub struct RankEngine {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    notifier: Arc<dyn Notifier>,
    table: RankRuleTable,
    max_depth: u32,
}

impl RankEngine {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        table: RankRuleTable,
        max_depth: u32,
    ) -> Self {
        Self {
            accounts,
            notifier,
            table,
            max_depth,
        }
    }

    pub fn table(&self) -> &RankRuleTable {
        &self.table
    }

    /// The tier the account qualifies for right now, hardest rule first.
    fn evaluate(&self, record: &AccountRecord, directs: &[AccountRecord]) -> TierId {
        for rule in self.table.iter_hardest_first() {
            if !record.team_volume.approx_ge(rule.min_team_volume, 1e-6) {
                continue;
            }
            if record.direct_count < rule.min_directs {
                continue;
            }
            if let Some(req) = &rule.structural {
                let qualified = directs
                    .iter()
                    .filter(|d| self.table.at_least(&d.tier, &req.tier))
                    .count() as u32;
                if qualified < req.count {
                    continue;
                }
            }
            return rule.tier.clone();
        }
        self.table.lowest().tier.clone()
    }

    /// The tier the account qualifies for, derived from scratch without
    /// persisting anything. The stored tier must always match this.
    pub fn derived_tier(&self, account: AccountId) -> Result<TierId, RankError> {
        let record = self.accounts.get_account(account)?;
        let directs = self.accounts.directs_of(account)?;
        Ok(self.evaluate(&record, &directs))
    }

    /// Recompute an account's rank and walk upward while changes keep
    /// rippling. Returns every transition that was persisted.
    ///
    /// The walk is iterative with the same depth ceiling as volume
    /// propagation; a malformed (cyclic) sponsor graph truncates with a
    /// warning instead of looping forever.
    pub fn recompute_rank(&self, account: AccountId) -> Result<Vec<RankChange>, RankError> {
        let mut changes = Vec::new();
        let mut current = Some(account);
        let mut depth = 0u32;

        while let Some(id) = current {
            if depth >= self.max_depth {
                tracing::warn!(
                    start = %account,
                    depth,
                    "rank re-evaluation exceeded depth ceiling, truncating"
                );
                break;
            }
            depth += 1;

            let mut record = self.accounts.get_account(id)?;
            let directs = self.accounts.directs_of(id)?;
            let new_tier = self.evaluate(&record, &directs);
            if new_tier == record.tier {
                break;
            }

            let from = record.tier.clone();
            let promoted = self.table.index_of(&new_tier) > self.table.index_of(&from);
            record.tier = new_tier.clone();
            self.accounts.put_account(&record)?;

            tracing::info!(%id, %from, to = %new_tier, promoted, "rank changed");
            self.notify_change(id, &from, &new_tier, promoted);
            changes.push(RankChange {
                account: id,
                from,
                to: new_tier,
                promoted,
            });

            // This change may make or break the sponsor's structural
            // prerequisite — keep walking.
            current = record.referrer;
        }
        Ok(changes)
    }

    fn notify_change(&self, account: AccountId, from: &TierId, to: &TierId, promoted: bool) {
        let (category, title, icon) = if promoted {
            (NotifyCategory::RankPromotion, "Rank advanced", "rank-up")
        } else {
            (NotifyCategory::RankDemotion, "Rank adjusted", "rank-down")
        };
        self.notifier.notify(
            account,
            category,
            title,
            &format!("Your rank changed from {} to {}", from, to),
            icon,
            json!({ "from": from.as_str(), "to": to.as_str() }),
        );
    }
}
