use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use hashbrown::DefaultHashBuilder;
use parking_lot::Mutex;

use crate::entry::{Expiry, Ttl};
use crate::options::Options;

/// A [`Cache`](crate::Cache) behind a single mutex, for shared use across
/// threads.
///
/// One lock guards the storage and the recency order together, so every
/// operation observes and leaves a consistent cache. All methods take
/// `&self` and return owned values; iteration is not exposed here since it
/// would hold the lock open, use the unsynchronized type for that.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use tmp_cache::sync::Cache;
///
/// let cache = Arc::new(Cache::new(64));
///
/// let workers: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = Arc::clone(&cache);
///         thread::spawn(move || {
///             for i in 0..16u32 {
///                 cache.insert((t, i), i);
///             }
///         })
///     })
///     .collect();
///
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 64);
/// ```
pub struct Cache<K, V, H = DefaultHashBuilder> {
    inner: Mutex<crate::cache::Cache<K, V, H>>,
}

impl<K, V> Cache<K, V, DefaultHashBuilder> {
    /// Creates an empty `Cache` holding at most `capacity` entries; `0`
    /// means unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(crate::cache::Cache::new(capacity)),
        }
    }

    /// Creates an empty `Cache` from [`Options`].
    pub fn with_options(options: Options) -> Self {
        Self {
            inner: Mutex::new(crate::cache::Cache::with_options(options)),
        }
    }
}

impl<K, V, H> Cache<K, V, H> {
    /// Creates an empty `Cache` from [`Options`] and an explicit hasher.
    pub fn with_options_and_hasher(options: Options, hash_builder: H) -> Self {
        Self {
            inner: Mutex::new(crate::cache::Cache::with_options_and_hasher(
                options,
                hash_builder,
            )),
        }
    }

    /// The configured capacity; `None` means unbounded.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.inner.lock().capacity()
    }

    /// The TTL applied by [`Cache::insert`].
    pub fn default_ttl(&self) -> Ttl {
        self.inner.lock().default_ttl()
    }

    /// Whether expired entries are returned once before being purged.
    pub fn is_stale(&self) -> bool {
        self.inner.lock().is_stale()
    }

    /// Returns the exact number of unexpired entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns the number of stored entries, counting expired ones no read
    /// has purged yet.
    pub fn len_approx(&self) -> usize {
        self.inner.lock().len_approx()
    }

    /// Returns `true` if the cache holds no unexpired entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V, H> Cache<K, V, H>
where
    K: Hash + Eq,
    H: BuildHasher,
{
    /// Inserts a key-value pair with the instance default TTL, returning the
    /// replaced live value. See [`Cache::insert`](crate::Cache::insert).
    pub fn insert(&self, k: K, v: V) -> Option<V> {
        self.inner.lock().insert(k, v)
    }

    /// Inserts a key-value pair with an explicit TTL. See
    /// [`Cache::insert_ttl`](crate::Cache::insert_ttl).
    pub fn insert_ttl(&self, k: K, v: V, ttl: Ttl) -> Option<V> {
        self.inner.lock().insert_ttl(k, v, ttl)
    }

    /// Refreshing read. See [`Cache::get`](crate::Cache::get).
    pub fn get<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(k)
    }

    /// Non-refreshing read. See [`Cache::peek`](crate::Cache::peek).
    pub fn peek<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().peek(k)
    }

    /// Returns `true` if the cache holds an unexpired entry for `key`.
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(k)
    }

    /// Returns the recorded expiry of a stored entry.
    pub fn expiry<Q>(&self, k: &Q) -> Option<Expiry>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().expiry(k)
    }

    /// Removes `key`, returning its value if the entry was live. See
    /// [`Cache::remove`](crate::Cache::remove).
    pub fn remove<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(k)
    }
}
