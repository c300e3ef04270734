//! Coalescing of concurrent refresh exchanges.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use super::RefreshOutcome;

#[derive(Debug, Default)]
struct Ledger {
    generation: u64,
    /// Token whose rejection started the last exchange.
    rejected: String,
    last: Option<RefreshOutcome>,
}

/// Serializes refresh exchanges and shares their outcome.
///
/// A request notes the gate generation after it is authenticated. When it
/// comes back with a 401, [`RefreshGate::run`] hands back the outcome of
/// the last exchange if that exchange finished after this request was sent
/// and was started by a rejection of the same token; otherwise it performs
/// a new exchange. Every request that was in flight under the old token
/// therefore gets the same new token or the same failure from a single
/// exchange, and a request holding a token from a newer exchange never
/// reuses an outcome that predates it.
#[derive(Debug, Default)]
pub struct RefreshGate {
    ledger: Mutex<Ledger>,
    generation: AtomicU64,
}

impl RefreshGate {
    /// Creates a gate with no completed refreshes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of refresh exchanges completed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Runs `exchange` unless a refresh for the same rejected token
    /// completed after `observed`.
    ///
    /// `rejected` is the access token the failed request carried.
    /// `exchange` must apply its outcome to the session before returning;
    /// waiters that reuse the outcome do not apply it again.
    pub async fn run<F, Fut>(&self, observed: u64, rejected: &str, exchange: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let mut ledger = self.ledger.lock().await;
        if ledger.generation > observed
            && ledger.rejected == rejected
            && let Some(outcome) = &ledger.last
        {
            debug!(
                generation = ledger.generation,
                "reusing outcome of concurrent refresh"
            );
            return outcome.clone();
        }

        let outcome = exchange().await;
        ledger.generation += 1;
        rejected.clone_into(&mut ledger.rejected);
        ledger.last = Some(outcome.clone());
        self.generation.store(ledger.generation, Ordering::Release);
        outcome
    }
}
