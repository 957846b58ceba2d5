//! The daily distribution orchestrator.
//!
//! One cron-triggered batch run: expire matured stakes, credit yield, and
//! fan out the three commission schemes for every active stake. Stakes are
//! processed sequentially and each stake's full cascade completes before
//! the next begins, so a mid-cascade failure is confined to one stake.

use std::sync::Arc;
use std::time::Instant;

use canopy_ledger::CurrencyLedger;
use canopy_rewards::{DirectBonus, RankBonusLedger, UnilevelDistributor};
use canopy_store::{
    AccountStore, CommissionStore, EntryKind, MetaStore, Notifier, RunLogStore, RunRecord,
    StakeRecord, StakeStore, TransactionStore,
};
use canopy_types::{Amount, RunStatus, Timestamp};

use crate::{EngineConfig, EngineError, RunSnapshot, StakeDesk};

/// What happened to one stake during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StakeOutcome {
    /// Matured and flipped to `Completed`; no yield paid on expiry day.
    Expired,
    /// Yield credited and commissions cascaded.
    Yielded {
        yield_paid: Amount,
        commissions: Amount,
    },
    /// Already processed for this UTC day — the idempotency guard fired.
    AlreadyProcessed,
}

#[derive(Default)]
struct RunTally {
    processed: u64,
    expired: u64,
    skipped: u64,
    total_yield: Amount,
    total_commissions: Amount,
    errors: Vec<String>,
}

/// Per-run components built from one [`RunSnapshot`].
struct RunContext {
    snapshot: RunSnapshot,
    ledger: CurrencyLedger,
    direct: DirectBonus,
    rank_bonus: RankBonusLedger,
    unilevel: UnilevelDistributor,
}

pub struct DistributionJob {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    stakes: Arc<dyn StakeStore + Send + Sync>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    commissions: Arc<dyn CommissionStore + Send + Sync>,
    run_log: Arc<dyn RunLogStore + Send + Sync>,
    meta: Arc<dyn MetaStore + Send + Sync>,
    notifier: Arc<dyn Notifier>,
    desk: StakeDesk,
}

impl DistributionJob {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        stakes: Arc<dyn StakeStore + Send + Sync>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        commissions: Arc<dyn CommissionStore + Send + Sync>,
        run_log: Arc<dyn RunLogStore + Send + Sync>,
        meta: Arc<dyn MetaStore + Send + Sync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let desk = StakeDesk::new(
            accounts.clone(),
            stakes.clone(),
            transactions.clone(),
            meta.clone(),
            notifier.clone(),
        );
        Self {
            accounts,
            stakes,
            transactions,
            commissions,
            run_log,
            meta,
            notifier,
            desk,
        }
    }

    pub fn desk(&self) -> &StakeDesk {
        &self.desk
    }

    fn context(&self, snapshot: RunSnapshot) -> RunContext {
        let ledger = CurrencyLedger::new(
            self.accounts.clone(),
            self.transactions.clone(),
            snapshot.params.amount_epsilon,
        );
        let direct = DirectBonus::new(
            self.accounts.clone(),
            ledger.clone(),
            self.notifier.clone(),
            snapshot.params.direct_bonus_rates_pct.clone(),
        );
        let rank_bonus = RankBonusLedger::new(
            self.accounts.clone(),
            self.stakes.clone(),
            ledger.clone(),
            self.notifier.clone(),
            snapshot.table.clone(),
            snapshot.params.amount_epsilon,
        );
        let unilevel = UnilevelDistributor::new(
            self.accounts.clone(),
            self.stakes.clone(),
            self.commissions.clone(),
            ledger.clone(),
            self.notifier.clone(),
            snapshot.params.unilevel_rates_pct.clone(),
        );
        RunContext {
            snapshot,
            ledger,
            direct,
            rank_bonus,
            unilevel,
        }
    }

    // ── Single-flight lock ─────────────────────────────────────────────

    fn lock_key(job_name: &str) -> String {
        format!("job_lock:{}", job_name)
    }

    fn acquire_lock(&self, job_name: &str, now: Timestamp) -> Result<(), EngineError> {
        let key = Self::lock_key(job_name);
        if self.meta.get_meta(&key)?.is_some() {
            return Err(EngineError::JobAlreadyRunning(job_name.to_string()));
        }
        self.meta.put_meta(&key, &now.as_secs().to_be_bytes())?;
        Ok(())
    }

    fn release_lock(&self, job_name: &str) {
        if let Err(e) = self.meta.delete_meta(&Self::lock_key(job_name)) {
            tracing::error!(job_name, error = %e, "failed to release job lock");
        }
    }

    // ── The run ────────────────────────────────────────────────────────

    /// Execute one distribution run and write exactly one run record.
    ///
    /// Per-stake failures are collected and reported in the record without
    /// failing the run; only a top-level storage failure produces a
    /// `Failed` record.
    pub fn run(&self, config: &EngineConfig, now: Timestamp) -> Result<RunRecord, EngineError> {
        let snapshot = RunSnapshot::capture(config)?;
        self.acquire_lock(&config.job_name, now)?;
        let started = Instant::now();

        let result = self.execute(snapshot, now);
        self.release_lock(&config.job_name);
        let duration_ms = started.elapsed().as_millis() as u64;

        let record = match result {
            Ok(tally) => {
                let message = format!(
                    "processed {} stakes, expired {}, skipped {} already-processed, {} errors",
                    tally.processed,
                    tally.expired,
                    tally.skipped,
                    tally.errors.len()
                );
                RunRecord {
                    job: config.job_name.clone(),
                    status: RunStatus::Success,
                    message,
                    stakes_processed: tally.processed,
                    stakes_expired: tally.expired,
                    total_yield: tally.total_yield,
                    total_commissions: tally.total_commissions,
                    duration_ms,
                    errors: tally.errors,
                    started_at: now,
                }
            }
            Err(e) => RunRecord {
                job: config.job_name.clone(),
                status: RunStatus::Failed,
                message: e.to_string(),
                stakes_processed: 0,
                stakes_expired: 0,
                total_yield: Amount::ZERO,
                total_commissions: Amount::ZERO,
                duration_ms,
                errors: vec![e.to_string()],
                started_at: now,
            },
        };
        self.run_log.append_run(&record)?;
        tracing::info!(
            job = %record.job,
            status = %record.status,
            stakes = record.stakes_processed,
            expired = record.stakes_expired,
            yield_total = %record.total_yield,
            commissions = %record.total_commissions,
            duration_ms = record.duration_ms,
            "distribution run finished"
        );
        Ok(record)
    }

    fn execute(&self, snapshot: RunSnapshot, now: Timestamp) -> Result<RunTally, EngineError> {
        let ctx = self.context(snapshot);
        let active = self.stakes.active_stakes()?;
        let mut tally = RunTally::default();

        for stake in active {
            match self.process_stake(&ctx, &stake, now) {
                Ok(StakeOutcome::Expired) => tally.expired += 1,
                Ok(StakeOutcome::Yielded {
                    yield_paid,
                    commissions,
                }) => {
                    tally.processed += 1;
                    tally.total_yield = (tally.total_yield + yield_paid).round2();
                    tally.total_commissions = (tally.total_commissions + commissions).round2();
                }
                Ok(StakeOutcome::AlreadyProcessed) => tally.skipped += 1,
                Err(e) => {
                    tracing::error!(stake = %stake.id, error = %e, "stake cascade failed");
                    tally.errors.push(format!("{}: {}", stake.id, e));
                }
            }
        }
        Ok(tally)
    }

    /// One stake's full cascade: expiry check, idempotency guard, yield,
    /// then the three commission schemes.
    fn process_stake(
        &self,
        ctx: &RunContext,
        stake: &StakeRecord,
        now: Timestamp,
    ) -> Result<StakeOutcome, EngineError> {
        if stake.is_matured(now) {
            self.desk.expire_stake(&ctx.snapshot, stake)?;
            return Ok(StakeOutcome::Expired);
        }
        if stake.yielded_on(now) {
            return Ok(StakeOutcome::AlreadyProcessed);
        }

        let daily_yield = stake.daily_yield();
        ctx.ledger.credit_reward(
            &ctx.snapshot.routing,
            stake.account,
            daily_yield,
            EntryKind::Yield,
            Some(stake.id),
            now,
        )?;

        let mut commissions = Amount::ZERO;
        if ctx.snapshot.params.referral_bonuses_enabled {
            commissions += ctx.direct.distribute(
                &ctx.snapshot.routing,
                stake.account,
                stake.id,
                daily_yield,
                now,
            )?;
            commissions += ctx
                .rank_bonus
                .distribute(
                    &ctx.snapshot.routing,
                    stake.account,
                    stake.id,
                    daily_yield,
                    now,
                )?
                .paid();
            commissions += ctx.unilevel.distribute(
                &ctx.snapshot.routing,
                stake.account,
                stake.id,
                daily_yield,
                now,
            )?;
        }

        let mut updated = stake.clone();
        updated.last_yield_at = Some(now);
        self.stakes.put_stake(&updated)?;

        Ok(StakeOutcome::Yielded {
            yield_paid: daily_yield,
            commissions: commissions.round2(),
        })
    }
}
