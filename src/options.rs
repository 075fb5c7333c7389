use crate::entry::Ttl;

/// Construction options for [`Cache`].
///
/// The defaults mirror an unconfigured cache: unbounded, never expiring, and
/// strict (no stale reads).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tmp_cache::{Cache, Options, Ttl};
///
/// let cache: Cache<&str, u32> = Cache::with_options(Options {
///     capacity: 128,
///     ttl: Ttl::After(Duration::from_secs(30)),
///     ..Options::default()
/// });
///
/// assert!(!cache.is_stale());
/// ```
///
/// [`Cache`]: crate::Cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of stored entries; `0` means unbounded.
    pub capacity: usize,
    /// TTL applied when [`Cache::insert`] is not given an explicit one.
    ///
    /// [`Cache::insert`]: crate::Cache::insert
    pub ttl: Ttl,
    /// If `true`, an expired entry's value is still returned once on the read
    /// that purges it.
    pub stale: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            capacity: 0,
            ttl: Ttl::Never,
            stale: false,
        }
    }
}
