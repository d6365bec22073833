use crate::hash::{make_hash, shard_index};
use crate::item::Item;

use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;
use parking_lot::RwLock;

type Shard = RwLock<HashMap<String, Item>>;

/// Concurrent key to [`Item`] map.
///
/// Keys are spread over a fixed number of independently locked shards, so
/// callers touching different shards never wait on each other and no
/// operation ever locks the whole map.
pub(crate) struct Storage {
    hash_builder: DefaultHashBuilder,
    shards: Box<[Shard]>,
}

impl Storage {
    pub fn with_shards(shards: usize) -> Self {
        let shards = shards.max(1);

        Self {
            hash_builder: DefaultHashBuilder::default(),
            shards: (0..shards)
                .map(|_| RwLock::new(HashMap::new()))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    pub fn from_items<I>(shards: usize, items: I) -> Self
    where
        I: IntoIterator<Item = (String, Item)>,
    {
        let storage = Self::with_shards(shards);
        for (key, item) in items {
            storage.store(key, item);
        }

        storage
    }

    #[inline]
    fn shard(&self, key: &str) -> &Shard {
        let hash = make_hash(&self.hash_builder, key);
        &self.shards[shard_index(hash, self.shards.len())]
    }

    /// Returns a copy of the item stored for `key`.
    pub fn load(&self, key: &str) -> Option<Item> {
        self.shard(key).read().get(key).cloned()
    }

    /// Runs `f` on the item stored for `key` while the shard is read locked.
    pub fn load_with<F, R>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Item) -> R,
    {
        self.shard(key).read().get(key).map(f)
    }

    /// Inserts or replaces the item for `key`, returning the replaced item.
    pub fn store(&self, key: String, item: Item) -> Option<Item> {
        self.shard(&key).write().insert(key, item)
    }

    pub fn remove(&self, key: &str) -> Option<Item> {
        self.shard(key).write().remove(key)
    }

    /// Removes the item for `key` only if `pred` holds for it.
    ///
    /// The check and the removal happen under the same shard lock.
    pub fn remove_if<F>(&self, key: &str, pred: F) -> Option<Item>
    where
        F: FnOnce(&Item) -> bool,
    {
        let mut shard = self.shard(key).write();
        if shard.get(key).map_or(false, pred) {
            shard.remove(key)
        } else {
            None
        }
    }

    /// Visits every entry until `visit` returns false.
    ///
    /// Shards are copied one at a time and the lock is released before any
    /// entry of that shard is visited, so `visit` may freely call back into the
    /// map. Every key present for the whole scan is visited exactly once. Keys
    /// inserted or removed during the scan may or may not be seen.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &Item) -> bool,
    {
        for shard in self.shards.iter() {
            let snapshot: Vec<(String, Item)> = shard
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            for (key, item) in snapshot.iter() {
                if !visit(key, item) {
                    return;
                }
            }
        }
    }

    /// Removes every entry, returning how many were removed.
    pub fn drain(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut shard = shard.write();
                let len = shard.len();
                shard.clear();
                len
            })
            .sum()
    }

    /// Returns the exact number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
