//! Team volume propagation up the sponsor tree.

use std::sync::Arc;

use canopy_store::AccountStore;
use canopy_types::{AccountId, Amount};

use crate::{RankChange, RankEngine, RankError};

/// Applies a signed volume delta to an account and every ancestor,
/// re-evaluating rank for each node touched.
///
/// The walk is iterative with an explicit depth counter; a chain deeper
/// than the ceiling (a malformed or cyclic sponsor graph) truncates with a
/// data-integrity warning rather than failing the operation.
#[derive(Clone)]
pub struct TeamVolumePropagator {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    ranks: RankEngine,
    max_depth: u32,
}

impl TeamVolumePropagator {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        ranks: RankEngine,
        max_depth: u32,
    ) -> Self {
        Self {
            accounts,
            ranks,
            max_depth,
        }
    }

    pub fn ranks(&self) -> &RankEngine {
        &self.ranks
    }

    /// Add `delta` (positive on stake creation, negative on expiry) to the
    /// account's team volume and every ancestor's, floor-clamped at zero.
    /// Returns all rank changes triggered along the chain.
    pub fn apply_volume_delta(
        &self,
        account: AccountId,
        delta: Amount,
    ) -> Result<Vec<RankChange>, RankError> {
        let mut changes = Vec::new();
        let mut current = Some(account);
        let mut depth = 0u32;

        while let Some(id) = current {
            if depth >= self.max_depth {
                tracing::warn!(
                    start = %account,
                    depth,
                    "sponsor chain exceeded depth ceiling, truncating volume propagation"
                );
                break;
            }
            depth += 1;

            let mut record = self.accounts.get_account(id)?;
            record.team_volume = (record.team_volume + delta).round2().clamp_floor_zero();
            self.accounts.put_account(&record)?;

            changes.extend(self.ranks.recompute_rank(id)?);
            current = record.referrer;
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RankRuleTable;
    use canopy_nullables::{MemoryStore, RecordingNotifier};
    use canopy_store::AccountRecord;
    use canopy_types::{TierId, Timestamp};

    fn propagator(store: Arc<MemoryStore>, max_depth: u32) -> TeamVolumePropagator {
        let notifier = Arc::new(RecordingNotifier::new());
        let ranks = RankEngine::new(
            store.clone(),
            notifier,
            RankRuleTable::default_table(),
            max_depth,
        );
        TeamVolumePropagator::new(store, ranks, max_depth)
    }

    fn add_account(store: &MemoryStore, id: u64, referrer: Option<u64>) {
        store
            .put_account(&AccountRecord::new(
                AccountId::new(id),
                referrer.map(AccountId::new),
                TierId::new("B0"),
                Timestamp::new(0),
            ))
            .unwrap();
    }

    fn volume(store: &MemoryStore, id: u64) -> Amount {
        store.get_account(AccountId::new(id)).unwrap().team_volume
    }

    #[test]
    fn delta_reaches_every_ancestor() {
        let store = Arc::new(MemoryStore::new());
        add_account(&store, 1, None);
        add_account(&store, 2, Some(1));
        add_account(&store, 3, Some(2));

        let p = propagator(store.clone(), 50);
        p.apply_volume_delta(AccountId::new(3), Amount::new(100.0))
            .unwrap();

        assert_eq!(volume(&store, 3), Amount::new(100.0));
        assert_eq!(volume(&store, 2), Amount::new(100.0));
        assert_eq!(volume(&store, 1), Amount::new(100.0));
    }

    #[test]
    fn negative_delta_clamps_at_zero() {
        let store = Arc::new(MemoryStore::new());
        add_account(&store, 1, None);
        add_account(&store, 2, Some(1));

        let p = propagator(store.clone(), 50);
        p.apply_volume_delta(AccountId::new(2), Amount::new(50.0))
            .unwrap();
        p.apply_volume_delta(AccountId::new(2), Amount::new(-80.0))
            .unwrap();

        assert_eq!(volume(&store, 2), Amount::ZERO);
        assert_eq!(volume(&store, 1), Amount::ZERO);
    }

    #[test]
    fn cyclic_sponsor_graph_truncates_instead_of_looping() {
        let store = Arc::new(MemoryStore::new());
        // 1 → 2 → 1: malformed data, must not hang.
        add_account(&store, 1, Some(2));
        add_account(&store, 2, Some(1));

        let p = propagator(store.clone(), 10);
        p.apply_volume_delta(AccountId::new(1), Amount::new(10.0))
            .unwrap();

        // Each node was visited max_depth/2 times, then the walk stopped.
        assert_eq!(volume(&store, 1), Amount::new(50.0));
        assert_eq!(volume(&store, 2), Amount::new(50.0));
    }

    #[test]
    fn volume_growth_triggers_rank_changes_along_the_chain() {
        let store = Arc::new(MemoryStore::new());
        add_account(&store, 1, None);
        add_account(&store, 2, Some(1));
        add_account(&store, 3, Some(1));
        // Sponsor 1 has two directs; volume is what it lacks for B1.
        let mut rec = store.get_account(AccountId::new(1)).unwrap();
        rec.direct_count = 2;
        store.put_account(&rec).unwrap();

        let p = propagator(store.clone(), 50);
        let changes = p
            .apply_volume_delta(AccountId::new(2), Amount::new(1_200.0))
            .unwrap();

        assert!(changes
            .iter()
            .any(|c| c.account == AccountId::new(1) && c.to == TierId::new("B1")));
    }
}
