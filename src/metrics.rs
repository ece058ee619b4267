use std::sync::atomic::{AtomicU64, Ordering};

/// Always-lock-free counter bank for queue activity.
///
/// Every counter is an independent relaxed atomic. Incrementing is a single
/// untaken branch (`enable_metrics`) away from free when metrics are disabled.
#[derive(Debug, Default)]
pub struct Metrics {
    offers_succeeded: AtomicU64,
    offers_rejected_full: AtomicU64,
    polls_succeeded: AtomicU64,
    polls_empty: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_offer_success(&self) {
        self.offers_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_offer_rejected_full(&self) {
        self.offers_rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_poll_success(&self) {
        self.polls_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_poll_empty(&self) {
        self.polls_empty.fetch_add(1, Ordering::Relaxed);
    }

    /// Collects an immutable, point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            offers_succeeded: self.offers_succeeded.load(Ordering::Relaxed),
            offers_rejected_full: self.offers_rejected_full.load(Ordering::Relaxed),
            polls_succeeded: self.polls_succeeded.load(Ordering::Relaxed),
            polls_empty: self.polls_empty.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of [`Metrics`]. All zero when metrics are disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub offers_succeeded: u64,
    pub offers_rejected_full: u64,
    pub polls_succeeded: u64,
    pub polls_empty: u64,
}
