use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

#[inline]
pub(crate) fn make_hash<K, Q, H>(hash_builder: &H, val: &Q) -> u64
where
    K: Borrow<Q>,
    Q: Hash + ?Sized,
    H: BuildHasher,
{
    use core::hash::Hasher;
    let mut state = hash_builder.build_hasher();
    val.hash(&mut state);
    state.finish()
}

#[inline]
pub(crate) fn make_insert_hash<K, H>(hash_builder: &H, val: &K) -> u64
where
    K: Hash,
    H: BuildHasher,
{
    use core::hash::Hasher;
    let mut state = hash_builder.build_hasher();
    val.hash(&mut state);
    state.finish()
}
