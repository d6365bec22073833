use std::hash::{BuildHasher, Hash, Hasher};

#[inline]
pub(crate) fn make_hash<Q, H>(hash_builder: &H, val: &Q) -> u64
where
    Q: Hash + ?Sized,
    H: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    val.hash(&mut state);
    state.finish()
}

/// Maps a hash onto one of `shards` slots.
///
/// Uses the high half of the hash. The shard maps hash with their own
/// builders, so this only has to spread keys evenly.
#[inline]
pub(crate) fn shard_index(hash: u64, shards: usize) -> usize {
    debug_assert!(shards > 0);
    ((hash >> 32) as usize) % shards
}
