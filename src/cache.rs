use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;
use std::time::Instant;

use hashbrown::{DefaultHashBuilder, HashTable};

use crate::entry::{Entry, Expiry, Ttl};
use crate::hash::{make_hash, make_insert_hash};
use crate::list::{Node, NodeRef, RecencyList};
use crate::options::Options;

/// A bounded key-value cache combining LRU eviction with per-entry TTL
/// expiration.
///
/// Capacity is enforced by entry count: inserting into a full cache evicts
/// the least-recently-touched entry. Expiration is lazy; an expired entry is
/// purged by the read that finds it, never by a background sweep. With
/// [`Options::stale`] set, that final read still hands back the expired value
/// once.
///
/// The recency order is a hash index over an explicit linked list of slots,
/// so touching an entry and evicting the victim are both O(1).
///
/// # Examples
///
/// ```
/// use tmp_cache::Cache;
///
/// let mut cache = Cache::new(2);
///
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
///
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.get(&"b"), Some(2));
/// assert_eq!(cache.get(&"c"), Some(3));
/// ```
pub struct Cache<K, V, H = DefaultHashBuilder> {
    table: HashTable<NodeRef>,
    list: RecencyList<K, V>,

    max: Option<NonZeroUsize>,
    ttl: Ttl,
    stale: bool,

    hash_builder: H,
}

impl<K, V> Cache<K, V, DefaultHashBuilder> {
    /// Creates an empty `Cache` holding at most `capacity` entries.
    ///
    /// A `capacity` of `0` means unbounded, matching an absent capacity in
    /// [`Options`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(16);
    /// cache.insert("answer", 42);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_options(Options {
            capacity,
            ..Options::default()
        })
    }

    /// Creates an empty `Cache` with no capacity bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let cache: Cache<u64, u64> = Cache::unbounded();
    /// assert_eq!(cache.capacity(), None);
    /// ```
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Creates an empty `Cache` from [`Options`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     capacity: 64,
    ///     ttl: Ttl::After(Duration::from_secs(30)),
    ///     stale: false,
    /// });
    /// cache.insert("answer", 42);
    /// ```
    pub fn with_options(options: Options) -> Self {
        Self::with_options_and_hasher(options, DefaultHashBuilder::default())
    }
}

impl<K, V, H> Cache<K, V, H> {
    /// Creates an empty `Cache` from [`Options`] and an explicit hasher.
    pub fn with_options_and_hasher(options: Options, hash_builder: H) -> Self {
        Self {
            table: HashTable::new(),
            list: RecencyList::new(),

            max: NonZeroUsize::new(options.capacity),
            ttl: options.ttl,
            stale: options.stale,

            hash_builder,
        }
    }

    /// The configured capacity; `None` means unbounded.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.max
    }

    /// The TTL applied by [`Cache::insert`].
    pub fn default_ttl(&self) -> Ttl {
        self.ttl
    }

    /// Whether expired entries are returned once before being purged.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns the exact number of unexpired entries.
    ///
    /// This walks the cache and skips entries that have expired but were not
    /// yet touched by a read; see [`Cache::len_approx`] for the O(1) count.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     ttl: Ttl::After(Duration::from_millis(10)),
    ///     ..Options::default()
    /// });
    ///
    /// cache.insert(0, "a");
    /// assert_eq!(cache.len(), 1);
    ///
    /// sleep(Duration::from_millis(30));
    /// assert_eq!(cache.len(), 0);
    /// assert_eq!(cache.len_approx(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns the number of stored entries, counting expired ones that no
    /// read has purged yet.
    pub fn len_approx(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the cache holds no unexpired entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry. Keeps the allocated memory for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    /// cache.insert(0, "a");
    /// cache.clear();
    /// assert!(cache.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
        self.list.clear();
    }

    /// An iterator over key-value pairs from least to most recently touched,
    /// skipping expired entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    ///
    /// let pairs: Vec<_> = cache.iter().collect();
    /// assert_eq!(pairs, vec![(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: &self.list,
            next: self.list.front(),
            now: Instant::now(),
        }
    }

    /// An iterator over keys from least to most recently touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(2);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// cache.insert("c", 3);
    ///
    /// let keys: Vec<_> = cache.keys().copied().collect();
    /// assert_eq!(keys, vec!["b", "c"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator over values from least to most recently touched.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K, V, H> Cache<K, V, H>
where
    K: Hash + Eq,
    H: BuildHasher,
{
    fn find_ref<Q>(&self, hash: u64, k: &Q) -> Option<NodeRef>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let list = &self.list;
        self.table
            .find(hash, |&r| k.eq(list.get(r).key.borrow()))
            .copied()
    }

    /// Drops the table slot pointing at `r`. The list node stays put.
    fn forget(&mut self, hash: u64, r: NodeRef) {
        if let Ok(slot) = self.table.find_entry(hash, |&x| x == r) {
            slot.remove();
        }
    }

    fn take_node(&mut self, hash: u64, r: NodeRef) -> Node<K, V> {
        self.forget(hash, r);
        self.list.remove(r)
    }

    fn evict_lru(&mut self) {
        if let Some(r) = self.list.front() {
            let hash = make_insert_hash::<K, H>(&self.hash_builder, &self.list.get(r).key);
            self.forget(hash, r);
            self.list.remove(r);
        }
    }

    /// Inserts a key-value pair with the instance default TTL.
    ///
    /// The entry lands at the most-recently-touched position. If the key was
    /// already present its old entry is replaced and the old value returned,
    /// unless it had expired, in which case `None` is returned. If the
    /// insertion would exceed the capacity, the least-recently-touched entry
    /// is evicted first; one insertion evicts at most one entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    ///
    /// assert_eq!(cache.insert(0, "a"), None);
    /// assert_eq!(cache.insert(0, "b"), Some("a"));
    /// assert_eq!(cache.get(&0), Some("b"));
    /// ```
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        let ttl = self.ttl;
        self.insert_ttl(k, v, ttl)
    }

    /// Inserts a key-value pair with an explicit TTL, overriding the
    /// instance default for this entry.
    ///
    /// `Ttl::After(Duration::ZERO)` is honored as a request for immediate
    /// expiration; it does not fall back to the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Ttl};
    ///
    /// let mut cache = Cache::new(4);
    ///
    /// cache.insert_ttl("gone", 1, Ttl::After(Duration::ZERO));
    /// cache.insert("kept", 2);
    ///
    /// assert_eq!(cache.get(&"gone"), None);
    /// assert_eq!(cache.get(&"kept"), Some(2));
    /// ```
    pub fn insert_ttl(&mut self, k: K, v: V, ttl: Ttl) -> Option<V> {
        let hash = make_insert_hash::<K, H>(&self.hash_builder, &k);
        let now = Instant::now();

        // an existing entry is dropped first so the reinsertion lands at the
        // MRU position instead of keeping the old slot in the order.
        let old = match self.find_ref(hash, &k) {
            Some(r) => {
                let node = self.take_node(hash, r);
                (!node.entry.is_expired(now)).then(|| node.entry.content)
            }
            None => None,
        };

        // capacity can only be exceeded by exactly one, so a single
        // insertion evicts at most one entry.
        if let Some(max) = self.max {
            if self.list.len() + 1 > max.get() {
                self.evict_lru();
            }
        }

        let r = self.list.push_back(k, Entry::new(v, ttl.expires_at(now)));

        let (table, list, hash_builder) = (&mut self.table, &self.list, &self.hash_builder);
        table.insert_unique(hash, r, |&x| {
            make_insert_hash::<K, H>(hash_builder, &list.get(x).key)
        });

        old
    }

    /// Returns the value for `key`, refreshing the entry.
    ///
    /// A hit moves the entry to the most-recently-touched position and
    /// recomputes its expiry from the instance default TTL (sliding
    /// expiration). An expired entry is purged; its value is still returned
    /// once when the cache was built with [`Options::stale`].
    ///
    /// Use [`Cache::peek`] for a read without the refresh.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     ttl: Ttl::After(Duration::from_millis(10)),
    ///     ..Options::default()
    /// });
    ///
    /// cache.insert(0, "0");
    /// assert_eq!(cache.get(&0), Some("0"));
    /// assert_eq!(cache.get(&1), None);
    ///
    /// sleep(Duration::from_millis(30));
    /// assert_eq!(cache.get(&0), None);
    /// ```
    pub fn get<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let hash = make_hash::<K, Q, H>(&self.hash_builder, k);
        let r = self.find_ref(hash, k)?;
        let now = Instant::now();

        if self.list.get(r).entry.is_expired(now) {
            let node = self.take_node(hash, r);
            return self.stale.then(|| node.entry.content);
        }

        // sliding expiration: the deadline restarts from "now" with the
        // default TTL, the same resolution an override-less insert uses.
        let expires = self.ttl.expires_at(now);
        self.list.get_mut(r).entry.expires = expires;
        self.list.move_to_back(r);

        Some(self.list.get(r).entry.content.clone())
    }

    /// Returns the value for `key` without refreshing the entry.
    ///
    /// A hit mutates neither the recency order nor the recorded expiry. An
    /// expired entry is still purged exactly as [`Cache::get`] would purge
    /// it, stale mode included.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     ttl: Ttl::After(Duration::from_secs(5)),
    ///     ..Options::default()
    /// });
    ///
    /// cache.insert("k", 1);
    /// let recorded = cache.expiry(&"k");
    ///
    /// sleep(Duration::from_millis(5));
    /// assert_eq!(cache.peek(&"k"), Some(1));
    /// assert_eq!(cache.expiry(&"k"), recorded);
    /// ```
    pub fn peek<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let hash = make_hash::<K, Q, H>(&self.hash_builder, k);
        let r = self.find_ref(hash, k)?;
        let now = Instant::now();

        if self.list.get(r).entry.is_expired(now) {
            let node = self.take_node(hash, r);
            return self.stale.then(|| node.entry.content);
        }

        Some(self.list.get(r).entry.content.clone())
    }

    /// Returns `true` if the cache holds an unexpired entry for `key`.
    ///
    /// Non-mutating: an expired entry makes this `false` but is left for the
    /// next read to purge.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     ttl: Ttl::After(Duration::from_millis(10)),
    ///     ..Options::default()
    /// });
    ///
    /// cache.insert(0, "a");
    /// assert!(cache.contains_key(&0));
    ///
    /// sleep(Duration::from_millis(30));
    /// assert!(!cache.contains_key(&0));
    /// ```
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash::<K, Q, H>(&self.hash_builder, k);
        match self.find_ref(hash, k) {
            Some(r) => !self.list.get(r).entry.is_expired(Instant::now()),
            None => false,
        }
    }

    /// Returns the recorded expiry of a stored entry, without checking
    /// whether it has already passed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use tmp_cache::{Cache, Options, Ttl};
    ///
    /// let mut cache = Cache::with_options(Options {
    ///     ttl: Ttl::After(Duration::from_secs(5)),
    ///     ..Options::default()
    /// });
    ///
    /// cache.insert("k", 1);
    /// let first = cache.expiry(&"k").unwrap().deadline().unwrap();
    ///
    /// sleep(Duration::from_millis(20));
    /// cache.get(&"k");
    ///
    /// let second = cache.expiry(&"k").unwrap().deadline().unwrap();
    /// assert!(second > first);
    /// ```
    pub fn expiry<Q>(&self, k: &Q) -> Option<Expiry>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash::<K, Q, H>(&self.hash_builder, k);
        let r = self.find_ref(hash, k)?;
        Some(self.list.get(r).entry.expires)
    }

    /// Removes `key`, returning its value if the entry was present and
    /// unexpired.
    ///
    /// An expired entry is removed as well but reported as `None`, so a
    /// caller cannot observe a value the cache already considers gone.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    /// cache.insert(0, "a");
    ///
    /// assert_eq!(cache.remove(&0), Some("a"));
    /// assert_eq!(cache.remove(&0), None);
    /// ```
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if the entry was
    /// present and unexpired.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    /// cache.insert(0, "a");
    ///
    /// assert_eq!(cache.remove_entry(&0), Some((0, "a")));
    /// assert_eq!(cache.remove_entry(&0), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = make_hash::<K, Q, H>(&self.hash_builder, k);
        let r = self.find_ref(hash, k)?;
        let now = Instant::now();

        let node = self.take_node(hash, r);
        (!node.entry.is_expired(now)).then(|| (node.key, node.entry.content))
    }

    /// Empties the cache, returning the unexpired key-value pairs as an
    /// iterator from least to most recently touched.
    ///
    /// Dropping the iterator drops any pairs not yet yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmp_cache::Cache;
    ///
    /// let mut cache = Cache::new(4);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    ///
    /// let pairs: Vec<_> = cache.drain().collect();
    /// assert_eq!(pairs, vec![("a", 1), ("b", 2)]);
    /// assert!(cache.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.table.clear();

        Drain {
            list: &mut self.list,
            now: Instant::now(),
        }
    }
}

impl<K, V, H> IntoIterator for Cache<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            list: self.list,
            now: Instant::now(),
        }
    }
}

impl<'a, K, V, H> IntoIterator for &'a Cache<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    next: Option<NodeRef>,
    now: Instant,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            list: self.list,
            next: self.next,
            now: self.now,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        while let Some(r) = self.next {
            self.next = list.next_of(r);

            let node = list.get(r);
            if !node.entry.is_expired(self.now) {
                return Some((&node.key, &node.entry.content));
            }
        }

        None
    }
}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

pub struct IntoIter<K, V> {
    list: RecencyList<K, V>,
    now: Instant,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.list.pop_front()?;
            if !node.entry.is_expired(self.now) {
                return Some((node.key, node.entry.content));
            }
        }
    }
}

pub struct Drain<'a, K, V> {
    list: &'a mut RecencyList<K, V>,
    now: Instant,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.list.pop_front()?;
            if !node.entry.is_expired(self.now) {
                return Some((node.key, node.entry.content));
            }
        }
    }
}

impl<'a, K, V> Drop for Drain<'a, K, V> {
    fn drop(&mut self) {
        self.list.clear();
    }
}

#[cfg(test)]
mod test_cache {
    use std::thread::sleep;
    use std::time::Duration;

    use super::*;

    fn with_ttl(ttl: Duration) -> Options {
        Options {
            ttl: Ttl::After(ttl),
            ..Options::default()
        }
    }

    fn deadline(cache: &Cache<&str, u32>, k: &str) -> Instant {
        match cache.expiry(&k) {
            Some(Expiry::At(at)) => at,
            other => panic!("expected a deadline, got {:?}", other),
        }
    }

    #[test]
    fn test_capacity_invariant() {
        let mut cache = Cache::new(3);

        for i in 0..10 {
            cache.insert(i, i);
            assert!(cache.len_approx() <= 3);
            assert!(cache.len() <= 3);
        }
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = Cache::new(2);

        cache.insert("a", 'A');
        cache.insert("b", 'B');
        cache.insert("c", 'C');

        assert_eq!(cache.get(&"c"), Some('C'));
        assert_eq!(cache.get(&"b"), Some('B'));
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let mut cache = Cache::new(2);

        cache.insert("a", 'A');
        cache.insert("b", 'B');

        // the refreshing read moves "a" to MRU, exposing "b" as the victim.
        assert_eq!(cache.get(&"a"), Some('A'));
        cache.insert("c", 'C');

        assert_eq!(cache.get(&"c"), Some('C'));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some('A'));
    }

    #[test]
    fn test_eviction_key_order() {
        let mut cache = Cache::new(5);

        for i in [0, 1, 2, 3] {
            cache.insert(i, ());
        }
        assert_eq!(cache.len(), 4);

        cache.insert(10, ());
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 10]);

        cache.insert(77, ());
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 10, 77]);
    }

    #[test]
    fn test_replace_moves_to_mru() {
        let mut cache = Cache::new(3);

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert_eq!(cache.insert("a", 4), Some(1));
        assert_eq!(
            cache.keys().copied().collect::<Vec<_>>(),
            ["b", "c", "a"]
        );

        // "b" is now the LRU victim, not "a".
        cache.insert("d", 5);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(4));
    }

    #[test]
    fn test_sliding_ttl() {
        let mut cache = Cache::with_options(with_ttl(Duration::from_millis(200)));

        cache.insert("k", 1);
        let first = deadline(&cache, "k");

        sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&"k"), Some(1));
        let second = deadline(&cache, "k");

        sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&"k"), Some(1));
        let third = deadline(&cache, "k");

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_stale_read_returns_value_once() {
        let mut cache = Cache::with_options(Options {
            ttl: Ttl::After(Duration::ZERO),
            stale: true,
            ..Options::default()
        });

        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), Some(1));
        assert!(!cache.contains_key(&"k"));
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn test_strict_read_drops_value() {
        let mut cache = Cache::with_options(with_ttl(Duration::ZERO));

        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), None);
        assert!(!cache.contains_key(&"k"));
    }

    #[test]
    fn test_stale_peek_purges_too() {
        let mut cache = Cache::with_options(Options {
            ttl: Ttl::After(Duration::ZERO),
            stale: true,
            ..Options::default()
        });

        cache.insert("k", 1);
        assert_eq!(cache.peek(&"k"), Some(1));
        assert_eq!(cache.len_approx(), 0);
        assert_eq!(cache.peek(&"k"), None);
    }

    #[test]
    fn test_peek_leaves_expiry_and_order() {
        let mut cache = Cache::with_options(Options {
            capacity: 2,
            ttl: Ttl::After(Duration::from_millis(200)),
            ..Options::default()
        });

        cache.insert("a", 1);
        cache.insert("b", 2);
        let recorded = deadline(&cache, "a");

        sleep(Duration::from_millis(5));
        assert_eq!(cache.peek(&"a"), Some(1));
        assert_eq!(cache.peek(&"a"), Some(1));
        assert_eq!(deadline(&cache, "a"), recorded);

        // "a" was not refreshed, so it is still the eviction victim.
        cache.insert("c", 3);
        assert_eq!(cache.peek(&"a"), None);
        assert_eq!(cache.peek(&"b"), Some(2));
    }

    #[test]
    fn test_zero_ttl_override_is_distinct() {
        // instance default never expires; the explicit zero must not fall
        // back to it.
        let mut cache = Cache::new(4);

        cache.insert_ttl("gone", 1, Ttl::After(Duration::ZERO));
        cache.insert("kept", 2);

        assert_eq!(cache.get(&"gone"), None);
        assert_eq!(cache.get(&"kept"), Some(2));
    }

    #[test]
    fn test_never_override_is_distinct() {
        let mut cache = Cache::with_options(with_ttl(Duration::from_millis(10)));

        cache.insert_ttl("k", 1, Ttl::Never);
        assert_eq!(cache.expiry(&"k"), Some(Expiry::Never));

        sleep(Duration::from_millis(30));
        assert_eq!(cache.peek(&"k"), Some(1));
    }

    #[test]
    fn test_never_expire_default() {
        let mut cache = Cache::new(0);

        cache.insert("k", 1);
        assert_eq!(cache.expiry(&"k"), Some(Expiry::Never));

        sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"k"), Some(1));
        assert!(cache.contains_key(&"k"));
    }

    #[test]
    fn test_remove() {
        let mut cache = Cache::with_options(with_ttl(Duration::from_secs(30)));

        cache.insert("k", 1);
        assert_eq!(cache.remove(&"k"), Some(1));
        assert_eq!(cache.remove(&"k"), None);
        assert_eq!(cache.get(&"k"), None);
        assert_eq!(cache.len_approx(), 0);
    }

    #[test]
    fn test_remove_expired_reports_none() {
        let mut cache = Cache::with_options(with_ttl(Duration::ZERO));

        cache.insert("k", 1);
        assert_eq!(cache.len_approx(), 1);

        assert_eq!(cache.remove(&"k"), None);
        assert_eq!(cache.len_approx(), 0);
    }

    #[test]
    fn test_remove_entry() {
        let mut cache = Cache::new(4);

        cache.insert("k", 1);
        assert_eq!(cache.remove_entry(&"k"), Some(("k", 1)));
        assert_eq!(cache.remove_entry(&"k"), None);
    }

    #[test]
    fn test_insert_over_expired_returns_none() {
        let mut cache = Cache::with_options(with_ttl(Duration::ZERO));

        assert_eq!(cache.insert("k", 1), None);
        assert_eq!(cache.insert("k", 2), None);

        let mut cache = Cache::new(4);
        assert_eq!(cache.insert("k", 1), None);
        assert_eq!(cache.insert("k", 2), Some(1));
    }

    #[test]
    fn test_defaults() {
        let cache: Cache<u32, u32> = Cache::with_options(Options::default());
        assert_eq!(cache.capacity(), None);
        assert_eq!(cache.default_ttl(), Ttl::Never);
        assert!(!cache.is_stale());

        let cache: Cache<u32, u32> = Cache::new(5);
        assert_eq!(cache.capacity(), NonZeroUsize::new(5));

        let cache: Cache<u32, u32> = Cache::unbounded();
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn test_iter_skips_expired() {
        let mut cache = Cache::new(4);

        cache.insert("a", 1);
        cache.insert_ttl("b", 2, Ttl::After(Duration::ZERO));
        cache.insert("c", 3);

        let pairs: Vec<_> = cache.iter().collect();
        assert_eq!(pairs, vec![(&"a", &1), (&"c", &3)]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.len_approx(), 3);
        assert_eq!(cache.values().copied().collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn test_into_iter() {
        let mut cache = Cache::new(4);

        cache.insert("a", 1);
        cache.insert_ttl("b", 2, Ttl::After(Duration::ZERO));
        cache.insert("c", 3);

        let pairs: Vec<_> = cache.into_iter().collect();
        assert_eq!(pairs, vec![("a", 1), ("c", 3)]);
    }

    #[test]
    fn test_drain() {
        let mut cache = Cache::new(4);

        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);
        cache.insert(4, 4);

        let sum: i32 = cache.drain().map(|(k, _)| k).sum();
        assert_eq!(sum, 10);
        assert!(cache.is_empty());
        assert_eq!(cache.len_approx(), 0);

        // a partially consumed drain still empties the cache.
        cache.insert(5, 5);
        cache.insert(6, 6);
        {
            let mut drain = cache.drain();
            assert_eq!(drain.next(), Some((5, 5)));
        }
        assert_eq!(cache.len_approx(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = Cache::new(4);

        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.len_approx(), 0);

        // reusable after clearing.
        cache.insert(3, 3);
        assert_eq!(cache.get(&3), Some(3));
    }

    #[test]
    fn test_borrowed_key_lookup() {
        let mut cache: Cache<String, u32> = Cache::new(4);

        cache.insert("alpha".to_owned(), 1);
        assert_eq!(cache.get("alpha"), Some(1));
        assert_eq!(cache.peek("alpha"), Some(1));
        assert!(cache.contains_key("alpha"));
        assert_eq!(cache.remove("alpha"), Some(1));
    }

    #[test]
    fn test_unbounded_growth() {
        let mut cache = Cache::unbounded();

        for i in 0..1024 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 1024);
        assert_eq!(cache.get(&0), Some(0));
        assert_eq!(cache.get(&1023), Some(1023));
    }
}
