use std::time::{Duration, Instant};

/// When a stored entry stops being readable.
///
/// "Never expires" is its own variant instead of a magic timestamp, so a
/// zero-duration TTL (which expires on the next read) stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires on its own; only eviction or removal ends it.
    Never,
    /// The entry is expired once the clock reaches this instant.
    At(Instant),
}

impl Expiry {
    /// Returns the deadline instant, or `None` for [`Expiry::Never`].
    #[inline]
    pub fn deadline(self) -> Option<Instant> {
        match self {
            Expiry::Never => None,
            Expiry::At(at) => Some(at),
        }
    }

    #[inline]
    pub(crate) fn is_expired(self, now: Instant) -> bool {
        match self {
            Expiry::Never => false,
            Expiry::At(at) => now >= at,
        }
    }
}

/// A time-to-live request, resolved into an [`Expiry`] when an entry is
/// written or refreshed.
///
/// `Ttl::After(Duration::ZERO)` is a valid request for immediate expiration;
/// it is never collapsed into "use the instance default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Entries live until evicted or removed.
    Never,
    /// Entries expire this long after the write or refresh that set them.
    After(Duration),
}

impl Ttl {
    #[inline]
    pub(crate) fn expires_at(self, now: Instant) -> Expiry {
        match self {
            Ttl::Never => Expiry::Never,
            Ttl::After(ttl) => Expiry::At(now + ttl),
        }
    }
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::After(ttl)
    }
}

pub(crate) struct Entry<V> {
    pub(crate) content: V,
    pub(crate) expires: Expiry,
}

impl<V> Entry<V> {
    pub(crate) fn new(content: V, expires: Expiry) -> Self {
        Self { content, expires }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expires.is_expired(now)
    }
}

#[cfg(test)]
mod test_entry {
    use super::*;

    #[test]
    fn test_never_is_not_expired() {
        let now = Instant::now();
        assert!(!Expiry::Never.is_expired(now + Duration::from_secs(3600)));
        assert_eq!(Expiry::Never.deadline(), None);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let now = Instant::now();
        let expiry = Expiry::At(now);

        assert!(expiry.is_expired(now));
        assert!(expiry.is_expired(now + Duration::from_millis(1)));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let now = Instant::now();
        let expiry = Ttl::After(Duration::ZERO).expires_at(now);

        assert_ne!(expiry, Expiry::Never);
        assert!(expiry.is_expired(now));
    }

    #[test]
    fn test_ttl_resolution() {
        let now = Instant::now();
        let ttl = Duration::from_secs(5);

        assert_eq!(Ttl::Never.expires_at(now), Expiry::Never);
        assert_eq!(Ttl::After(ttl).expires_at(now), Expiry::At(now + ttl));
        assert_eq!(Ttl::from(ttl), Ttl::After(ttl));
    }
}
