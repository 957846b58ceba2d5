use std::sync::Arc;

use proptest::prelude::*;

use canopy_nullables::{MemoryStore, RecordingNotifier};
use canopy_ranks::{RankEngine, RankRuleTable, TeamVolumePropagator};
use canopy_store::{AccountRecord, AccountStore};
use canopy_types::{AccountId, Amount, TierId, Timestamp};

fn build_tree(store: &MemoryStore, parents: &[usize]) {
    // Account ids are 1-based; parents[i] is the referrer index of
    // account i+2 among the already-created accounts.
    store
        .put_account(&AccountRecord::new(
            AccountId::new(1),
            None,
            TierId::new("B0"),
            Timestamp::new(0),
        ))
        .unwrap();
    for (i, p) in parents.iter().enumerate() {
        let id = i as u64 + 2;
        let referrer = (*p % (id as usize - 1)) as u64 + 1;
        store
            .put_account(&AccountRecord::new(
                AccountId::new(id),
                Some(AccountId::new(referrer)),
                TierId::new("B0"),
                Timestamp::new(0),
            ))
            .unwrap();
        let mut sponsor = store.get_account(AccountId::new(referrer)).unwrap();
        sponsor.direct_count += 1;
        store.put_account(&sponsor).unwrap();
    }
}

fn propagator(store: Arc<MemoryStore>) -> TeamVolumePropagator {
    let ranks = RankEngine::new(
        store.clone(),
        Arc::new(RecordingNotifier::new()),
        RankRuleTable::default_table(),
        50,
    );
    TeamVolumePropagator::new(store, ranks, 50)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Team volume never goes negative, whatever sequence of stake
    /// creations and expiries hits the tree.
    #[test]
    fn team_volume_never_negative(
        parents in prop::collection::vec(0usize..8, 1..8),
        deltas in prop::collection::vec((0u64..8, -500.0f64..500.0), 1..30),
    ) {
        let store = Arc::new(MemoryStore::new());
        build_tree(&store, &parents);
        let p = propagator(store.clone());
        let count = parents.len() as u64 + 1;

        for (target, delta) in deltas {
            let id = AccountId::new(target % count + 1);
            p.apply_volume_delta(id, Amount::new(delta)).unwrap();
        }

        for account in store.iter_accounts().unwrap() {
            prop_assert!(account.team_volume.value() >= 0.0);
        }
    }

    /// After any propagation sequence, every stored rank matches the rank
    /// re-derived from scratch.
    #[test]
    fn stored_rank_matches_rederivation(
        parents in prop::collection::vec(0usize..8, 1..8),
        deltas in prop::collection::vec((0u64..8, -5_000.0f64..20_000.0), 1..20),
    ) {
        let store = Arc::new(MemoryStore::new());
        build_tree(&store, &parents);
        let p = propagator(store.clone());
        let count = parents.len() as u64 + 1;

        for (target, delta) in deltas {
            let id = AccountId::new(target % count + 1);
            p.apply_volume_delta(id, Amount::new(delta)).unwrap();
        }

        for account in store.iter_accounts().unwrap() {
            let derived = p.ranks().derived_tier(account.id).unwrap();
            prop_assert_eq!(account.tier, derived);
        }
    }
}
