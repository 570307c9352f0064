use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Time source injected into the token manager.
///
/// Implementations are read concurrently by every caller of
/// `TokenManager::current_token`, so `now` must be a side-effect-free read.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Whole-second resolution.
#[derive(Debug, Default)]
pub struct ManualClock {
    unix_seconds: AtomicI64,
}

impl ManualClock {
    pub fn new(unix_seconds: i64) -> Self {
        Self {
            unix_seconds: AtomicI64::new(unix_seconds),
        }
    }

    pub fn set(&self, unix_seconds: i64) {
        self.unix_seconds.store(unix_seconds, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.unix_seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.unix_seconds.load(Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Whole seconds since the Unix epoch.
///
/// Sub-second precision is dropped. Issuance and freshness both go through
/// this function so the two never disagree on rounding.
pub fn epoch_seconds(at: &DateTime<Utc>) -> i64 {
    at.timestamp()
}

/// Whole seconds elapsed between `earlier` and `later`, using the same
/// truncation as [`epoch_seconds`].
pub fn elapsed_seconds(earlier: &DateTime<Utc>, later: &DateTime<Utc>) -> i64 {
    epoch_seconds(later) - epoch_seconds(earlier)
}
