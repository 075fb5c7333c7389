//! tmp-cache is a bounded in-process key-value cache combining two
//! independent eviction policies: capacity-based LRU eviction and per-entry
//! TTL expiration, with an optional stale mode that returns an expired value
//! once before purging it.
//!
//! Reads come in two flavors:
//! - [`Cache::get`] refreshes the entry: the expiry deadline restarts from
//!   "now" (sliding expiration) and the entry moves to the MRU position.
//! - [`Cache::peek`] reads without touching order or expiry.
//!
//! Expiration is lazy. There are no timers or background sweeps; an expired
//! entry is purged by the read that finds it.
//!
//! # Examples
//! ```
//! use std::thread::sleep;
//! use std::time::Duration;
//!
//! use tmp_cache::{Cache, Options, Ttl};
//!
//! fn main() {
//!     let mut cache = Cache::with_options(Options {
//!         capacity: 2,
//!         ttl: Ttl::After(Duration::from_millis(200)),
//!         ..Options::default()
//!     });
//!
//!     cache.insert("Still", "Alive");
//!     cache.insert_ttl("Gonna", "Die", Ttl::After(Duration::from_millis(10)));
//!
//!     sleep(Duration::from_millis(30));
//!
//!     assert_eq!(cache.get(&"Still"), Some("Alive"));
//!     assert_eq!(cache.get(&"Gonna"), None);
//! }
//! ```
//!
//! For shared use across threads, [`sync::Cache`] wraps the cache in a
//! single mutex.

// for internal use.
pub(crate) mod hash;
pub(crate) mod list;

// for external use.

/// The cache and its iterators.
mod cache;

/// Expiration types: the `Never | At` deadline and the TTL request.
mod entry;

/// Construction options.
mod options;

/// A mutex-guarded cache for shared use across threads.
pub mod sync;

#[doc(inline)]
pub use crate::cache::Cache;

pub use crate::cache::{Drain, IntoIter, Iter, Keys, Values};
pub use crate::entry::{Expiry, Ttl};
pub use crate::options::Options;
