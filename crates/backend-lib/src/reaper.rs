// ============================
// crates/backend-lib/src/reaper.rs
// ============================

//! Scheduled purge of stale unconfirmed accounts.
//!
//! The job itself swallows every failure and reports a count of 0; it
//! must never take the scheduler down with it. Retrying a *failed
//! invocation* (a task that died before the job could answer) is the
//! scheduler's concern and runs through a fixed delay ladder.
use chrono::{Duration as ChronoDuration, Utc};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ReaperSettings;
use crate::store::AccountStore;

/// Delete unconfirmed accounts registered before `now + offset_days`.
///
/// `offset_days` is negative by convention (-30 reaps accounts older
/// than 30 days); configuration rejects positive values at startup.
/// Returns the number of accounts deleted, 0 on any failure.
pub async fn reap_unconfirmed(store: &dyn AccountStore, offset_days: i64) -> u64 {
    let cutoff = Utc::now() + ChronoDuration::days(offset_days);
    match store.delete_unconfirmed_before(cutoff).await {
        Ok(count) => {
            if count > 0 {
                info!(count, %cutoff, "purged stale unconfirmed accounts");
            }
            counter!("reaper.accounts_deleted").increment(count);
            count
        },
        Err(err) => {
            error!(error = %err, "unconfirmed-account purge failed");
            0
        },
    }
}

/// Spawn the recurring trigger. Fires every `interval_secs`; a died
/// invocation is retried through `retry_delays_secs` up to
/// `max_attempts` times before the tick is abandoned.
pub fn spawn_reaper(
    store: Arc<dyn AccountStore>,
    settings: ReaperSettings,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_secs(settings.interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            run_invocation(&store, &settings).await;
        }
    })
}

async fn run_invocation(store: &Arc<dyn AccountStore>, settings: &ReaperSettings) {
    for attempt in 0..settings.max_attempts {
        let store = Arc::clone(store);
        let offset_days = settings.offset_days;
        let outcome =
            tokio::spawn(async move { reap_unconfirmed(store.as_ref(), offset_days).await })
                .await;
        match outcome {
            Ok(count) => {
                debug!(count, attempt, "reaper invocation finished");
                return;
            },
            // Only a dead task lands here; the job converts its own
            // failures to a zero count.
            Err(err) => {
                let delay = settings
                    .retry_delays_secs
                    .get(attempt as usize)
                    .or(settings.retry_delays_secs.last())
                    .copied()
                    .unwrap_or(60);
                warn!(error = %err, attempt, delay, "reaper invocation died, retrying");
                tokio::time::sleep(Duration::from_secs(delay)).await;
            },
        }
    }
    error!(
        attempts = settings.max_attempts,
        "reaper invocation abandoned"
    );
}
