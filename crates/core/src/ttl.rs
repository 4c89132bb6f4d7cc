//! Record expiration policy.
//!
//! A [`Ttl`] of zero means expiration is disabled. Backends translate an
//! enabled TTL either into an absolute timestamp stored next to the record
//! (DynamoDB) or into a relative expiry in seconds (Redis).

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Time-to-live applied to every record written by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(Duration);

impl Ttl {
    /// Expiration disabled.
    pub const DISABLED: Ttl = Ttl(Duration::ZERO);

    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn is_enabled(&self) -> bool {
        !self.0.is_zero()
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    /// Absolute expiry as epoch seconds: `now + ttl`.
    ///
    /// With the TTL disabled this is `now` itself.
    pub fn expires_at(&self, now: DateTime<Utc>) -> i64 {
        let ttl = chrono::Duration::from_std(self.0).unwrap_or(chrono::Duration::MAX);
        now.checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp()
    }

    /// Relative expiry in whole seconds, `None` when disabled.
    ///
    /// Fractional TTLs round up so a record never expires before its TTL;
    /// one second is also the smallest expiry Redis accepts for `EX`.
    pub fn expire_seconds(&self) -> Option<u64> {
        self.is_enabled().then(|| {
            let partial = u64::from(self.0.subsec_nanos() > 0);
            self.0.as_secs().saturating_add(partial)
        })
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

/// Whether a stored absolute expiry has passed.
pub fn is_expired(expires_at: i64, now: DateTime<Utc>) -> bool {
    expires_at <= now.timestamp()
}
