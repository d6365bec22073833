mod mutate;

use crate::config::CacheConfig;
use crate::counter::LiveCount;
use crate::error::{CacheError, Result};
use crate::item::Item;
use crate::janitor::Janitor;
use crate::policy::{self, Expiration};
use crate::storage::Storage;
use crate::value::Value;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Callback invoked with the key and the previous value of an evicted entry.
pub type EvictionHook = Arc<dyn Fn(&str, Value) + Send + Sync>;

/// State shared between the cache handle and its janitor.
struct Shared {
    storage: Storage,
    count: LiveCount,
    default_expiration: Option<Duration>,
    on_evicted: RwLock<Option<EvictionHook>>,
}

impl Shared {
    #[inline]
    fn hook(&self) -> Option<EvictionHook> {
        self.on_evicted.read().clone()
    }

    fn store(&self, key: String, item: Item) {
        self.storage.store(key, item);
        // counts overwrites too.
        self.count.increment();
    }

    fn write(&self, key: String, value: Value, expiration: Expiration) {
        let expires_at = policy::expires_at(Instant::now(), expiration, self.default_expiration);
        self.store(key, Item::new(value, expires_at));
    }

    /// Returns a copy of the item if it is live right now.
    fn live(&self, key: &str) -> Option<Item> {
        let now = Instant::now();
        self.storage
            .load_with(key, |item| {
                if item.is_expired_at(now) {
                    None
                } else {
                    Some(item.clone())
                }
            })
            .flatten()
    }

    fn delete(&self, key: &str) -> Option<Value> {
        if self.on_evicted.read().is_none() {
            // without a hook the count goes down whether or not the key existed.
            self.storage.remove(key);
            self.count.decrement();
            return None;
        }

        let removed = self.storage.remove(key)?;
        self.count.decrement();
        Some(removed.value)
    }

    fn delete_expired(&self) -> usize {
        let now = Instant::now();
        let mut evicted = Vec::new();

        self.storage.for_each(|key, item| {
            if !item.is_expired_at(now) {
                return true;
            }

            // the entry may have been rewritten since the shard was copied.
            if let Some(removed) = self.storage.remove_if(key, |cur| cur.is_expired_at(now)) {
                self.count.decrement();
                evicted.push((key.to_owned(), removed.value));
            }
            true
        });

        let removed = evicted.len();
        if removed > 0 {
            debug!(removed, "swept expired entries");
        }

        // hooks run only after the scan is over.
        if let Some(hook) = self.hook() {
            for (key, value) in evicted {
                hook(&key, value);
            }
        }

        removed
    }
}

/// A concurrent key-value cache where every entry carries an optional
/// expiration time.
///
/// Expired entries are never returned. They are reclaimed lazily, by an
/// explicit [`Cache::delete_expired`], or by a background janitor when the
/// cache is built with a cleanup interval. The janitor stops when
/// [`Cache::stop_janitor`] is called or the cache is dropped.
///
/// Share a cache between threads by wrapping it in an [`Arc`].
///
/// # Compound operations
///
/// [`add`](Cache::add), [`replace`](Cache::replace) and the whole increment /
/// decrement family read the entry and then write it back as two separate
/// steps. They are not atomic: concurrent writers to the same key race and the
/// last writer wins.
///
/// # Examples
///
/// ```
/// use adrenaline::{Cache, Expiration, Value};
/// use std::time::Duration;
///
/// let cache = Cache::new(Duration::from_secs(300), Duration::ZERO);
///
/// cache.set("hits", 1_i64, Expiration::Never);
/// cache.set("session", "abc", Expiration::Default);
///
/// assert_eq!(cache.increment_i64("hits", 2), Ok(3));
/// assert_eq!(cache.get("hits"), Some(Value::I64(3)));
/// assert!(cache.get_with_expiration("session").unwrap().1.is_some());
/// ```
pub struct Cache {
    shared: Arc<Shared>,
    janitor: Mutex<Option<Janitor>>,
}

impl Cache {
    /// Creates a cache.
    ///
    /// A zero `default_expiration` means entries written with
    /// [`Expiration::Default`] never expire. A zero `cleanup_interval` means no
    /// janitor is started.
    pub fn new(default_expiration: Duration, cleanup_interval: Duration) -> Self {
        Self::with_config(
            CacheConfig::new()
                .with_default_expiration(default_expiration)
                .with_cleanup_interval(cleanup_interval),
        )
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self::from_items(config, HashMap::new())
    }

    /// Creates a cache pre-populated with `items`, typically a snapshot taken
    /// earlier with [`Cache::items`]. Items that have already expired are kept
    /// and reclaimed like any other expired entry.
    pub fn from_items<I>(config: CacheConfig, items: I) -> Self
    where
        I: IntoIterator<Item = (String, Item)>,
    {
        let config = config.normalized();
        let storage = Storage::from_items(config.shards, items);
        let count = LiveCount::new(storage.len());

        let shared = Arc::new(Shared {
            storage,
            count,
            default_expiration: config.default_expiration,
            on_evicted: RwLock::new(None),
        });

        let janitor = config.cleanup_interval.and_then(|interval| {
            let target = Arc::clone(&shared);
            match Janitor::start(interval, move || {
                target.delete_expired();
            }) {
                Ok(janitor) => Some(janitor),
                Err(err) => {
                    warn!(%err, "failed to start janitor, expired entries are reclaimed lazily");
                    None
                }
            }
        });

        Self {
            shared,
            janitor: Mutex::new(janitor),
        }
    }

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// Replacing an entry does not fire the eviction hook.
    pub fn set<K, V, E>(&self, key: K, value: V, expiration: E)
    where
        K: Into<String>,
        V: Into<Value>,
        E: Into<Expiration>,
    {
        self.shared
            .write(key.into(), value.into(), expiration.into());
    }

    /// Stores `value` under `key` with the default expiration.
    pub fn set_default<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.set(key, value, Expiration::Default);
    }

    /// Stores `value` only if there is no live entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adrenaline::{Cache, CacheError, Expiration, Value};
    /// use std::time::Duration;
    ///
    /// let cache = Cache::new(Duration::ZERO, Duration::ZERO);
    ///
    /// assert!(cache.add("x", 5_i32, Expiration::Never).is_ok());
    /// assert_eq!(
    ///     cache.add("x", 9_i32, Expiration::Never),
    ///     Err(CacheError::AlreadyExists("x".into()))
    /// );
    /// assert_eq!(cache.get("x"), Some(Value::I32(5)));
    /// ```
    pub fn add<K, V, E>(&self, key: K, value: V, expiration: E) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
        E: Into<Expiration>,
    {
        let key = key.into();
        if self.shared.live(&key).is_some() {
            return Err(CacheError::AlreadyExists(key));
        }

        self.shared.write(key, value.into(), expiration.into());
        Ok(())
    }

    /// Stores `value` only if there is a live entry for `key`.
    pub fn replace<K, V, E>(&self, key: K, value: V, expiration: E) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
        E: Into<Expiration>,
    {
        let key = key.into();
        if self.shared.live(&key).is_none() {
            return Err(CacheError::NotFound(key));
        }

        self.shared.write(key, value.into(), expiration.into());
        Ok(())
    }

    /// Returns the value stored for `key`, or `None` if it is absent or has
    /// expired.
    ///
    /// # Examples
    ///
    /// ```
    /// use adrenaline::{Cache, Value};
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// let cache = Cache::new(Duration::ZERO, Duration::ZERO);
    /// cache.set("a", 1_i32, Duration::from_millis(10));
    /// assert_eq!(cache.get("a"), Some(Value::I32(1)));
    ///
    /// sleep(Duration::from_millis(20));
    /// assert_eq!(cache.get("a"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        self.shared
            .storage
            .load_with(key, |item| item.live_value(now).cloned())
            .flatten()
    }

    /// Like [`Cache::get`], also returning when the entry expires. The
    /// expiration is `None` for entries that never expire.
    pub fn get_with_expiration(&self, key: &str) -> Option<(Value, Option<Instant>)> {
        self.shared
            .live(key)
            .map(|item| (item.value, item.expires_at))
    }

    /// Removes the entry for `key`.
    ///
    /// The eviction hook fires once with the previous value if the key was
    /// present, expired or not.
    pub fn delete(&self, key: &str) {
        if let Some(value) = self.shared.delete(key) {
            if let Some(hook) = self.shared.hook() {
                hook(key, value);
            }
        }
    }

    /// Removes every expired entry right now, returning how many were removed.
    ///
    /// The eviction hook fires for each of them once the scan is complete.
    pub fn delete_expired(&self) -> usize {
        self.shared.delete_expired()
    }

    /// Registers a hook that fires whenever an entry is removed by
    /// [`Cache::delete`] or by a sweep. Overwrites and [`Cache::flush`] never
    /// fire it. Replaces any previously registered hook.
    ///
    /// # Examples
    ///
    /// ```
    /// use adrenaline::{Cache, Expiration};
    /// use std::sync::{Arc, Mutex};
    /// use std::time::Duration;
    ///
    /// let cache = Cache::new(Duration::ZERO, Duration::ZERO);
    /// let evicted = Arc::new(Mutex::new(Vec::new()));
    ///
    /// let sink = Arc::clone(&evicted);
    /// cache.on_evicted(move |key, _| sink.lock().unwrap().push(key.to_owned()));
    ///
    /// cache.set("a", 1_u8, Expiration::Never);
    /// cache.set("a", 2_u8, Expiration::Never);
    /// cache.delete("a");
    /// cache.delete("a");
    ///
    /// assert_eq!(*evicted.lock().unwrap(), vec!["a".to_owned()]);
    /// ```
    pub fn on_evicted<F>(&self, hook: F)
    where
        F: Fn(&str, Value) + Send + Sync + 'static,
    {
        *self.shared.on_evicted.write() = Some(Arc::new(hook));
    }

    /// Unregisters the eviction hook.
    pub fn remove_on_evicted(&self) {
        *self.shared.on_evicted.write() = None;
    }

    /// Returns a copy of every live entry.
    ///
    /// Expired entries are left out but not removed.
    pub fn items(&self) -> HashMap<String, Item> {
        let now = Instant::now();
        let mut items = HashMap::new();

        self.shared.storage.for_each(|key, item| {
            if !item.is_expired_at(now) {
                items.insert(key.to_owned(), item.clone());
            }
            true
        });

        items
    }

    /// Returns the approximate number of entries.
    ///
    /// This may include entries that have expired but were not swept yet, and
    /// repeated overwrites of the same key inflate it. Use
    /// [`Cache::items`] for an exact count of live entries.
    pub fn item_count(&self) -> usize {
        self.shared.count.snapshot()
    }

    /// Removes every entry without firing the eviction hook.
    pub fn flush(&self) {
        let removed = self.shared.storage.drain();
        self.shared.count.sub(removed);
    }

    /// Stops the janitor. Calling this more than once, or on a cache that
    /// never had a janitor, does nothing.
    pub fn stop_janitor(&self) {
        // released before joining, a sweep in flight may call back into the cache.
        let janitor = self.janitor.lock().take();
        if let Some(janitor) = janitor {
            janitor.stop();
        }
    }

    pub fn has_janitor(&self) -> bool {
        self.janitor.lock().is_some()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        if let Some(janitor) = self.janitor.get_mut().take() {
            janitor.stop();
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("item_count", &self.item_count())
            .field("default_expiration", &self.shared.default_expiration)
            .field("shards", &self.shared.storage.shard_count())
            .field("janitor", &self.janitor.lock().as_ref().map(Janitor::interval))
            .finish()
    }
}

#[cfg(test)]
mod test_cache {
    use super::Cache;
    use crate::config::CacheConfig;
    use crate::error::CacheError;
    use crate::item::Item;
    use crate::policy::Expiration;
    use crate::value::Value;

    use crossbeam::channel;

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::thread::{self, sleep};
    use std::time::{Duration, Instant};

    fn plain() -> Cache {
        Cache::new(Duration::ZERO, Duration::ZERO)
    }

    fn recording(cache: &Cache) -> Arc<Mutex<Vec<(String, Value)>>> {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        cache.on_evicted(move |k, v| sink.lock().unwrap().push((k.to_owned(), v)));
        evicted
    }

    #[test]
    fn test_default_expiration_scenario() {
        let cache = Cache::new(Duration::from_millis(50), Duration::ZERO);
        assert!(!cache.has_janitor());

        cache.set("a", 1_i32, Expiration::Default);
        assert_eq!(cache.get("a"), Some(Value::I32(1)));

        sleep(Duration::from_millis(60));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.item_count(), 1);

        assert_eq!(cache.delete_expired(), 1);
        assert_eq!(cache.item_count(), 0);
    }

    #[test]
    fn test_expired_counts_until_delete() {
        let cache = Cache::new(Duration::from_millis(10), Duration::ZERO);

        cache.set_default("a", 1_i32);
        sleep(Duration::from_millis(20));
        assert_eq!(cache.item_count(), 1);

        cache.delete("a");
        assert_eq!(cache.item_count(), 0);
    }

    #[test]
    fn test_never_expires() {
        let cache = Cache::new(Duration::from_millis(10), Duration::ZERO);

        cache.set("forever", 1_u8, Expiration::Never);
        cache.set("default", 2_u8, Expiration::Default);
        sleep(Duration::from_millis(20));

        assert_eq!(cache.get("forever"), Some(Value::U8(1)));
        assert_eq!(cache.get("default"), None);
        assert_eq!(
            cache.get_with_expiration("forever"),
            Some((Value::U8(1), None))
        );
    }

    #[test]
    fn test_no_default_means_never() {
        let cache = plain();

        cache.set_default("a", 1_u8);
        assert_eq!(cache.get_with_expiration("a"), Some((Value::U8(1), None)));
    }

    #[test]
    fn test_get_with_expiration() {
        let cache = plain();
        let before = Instant::now();

        cache.set("a", 1_i64, Duration::from_secs(60));
        let (value, expires_at) = cache.get_with_expiration("a").unwrap();

        assert_eq!(value, Value::I64(1));
        let expires_at = expires_at.unwrap();
        assert!(expires_at >= before + Duration::from_secs(60));
        assert!(expires_at <= Instant::now() + Duration::from_secs(60));

        assert!(cache.get_with_expiration("missing").is_none());
    }

    #[test]
    fn test_add() {
        let cache = plain();

        assert_eq!(cache.add("x", 5_i32, Expiration::Never), Ok(()));
        assert_eq!(
            cache.add("x", 9_i32, Expiration::Never),
            Err(CacheError::AlreadyExists("x".into()))
        );
        assert_eq!(cache.get("x"), Some(Value::I32(5)));
    }

    #[test]
    fn test_add_over_expired() {
        let cache = plain();

        cache.set("x", 1_i32, Duration::from_millis(5));
        sleep(Duration::from_millis(15));

        assert_eq!(cache.add("x", 2_i32, Expiration::Never), Ok(()));
        assert_eq!(cache.get("x"), Some(Value::I32(2)));
    }

    #[test]
    fn test_replace() {
        let cache = plain();

        assert_eq!(
            cache.replace("x", 1_i32, Expiration::Never),
            Err(CacheError::NotFound("x".into()))
        );
        assert_eq!(cache.get("x"), None);

        cache.set("x", 1_i32, Expiration::Never);
        assert_eq!(cache.replace("x", 2_i32, Expiration::Never), Ok(()));
        assert_eq!(cache.get("x"), Some(Value::I32(2)));

        cache.set("y", 1_i32, Duration::from_millis(5));
        sleep(Duration::from_millis(15));
        assert_eq!(
            cache.replace("y", 2_i32, Expiration::Never),
            Err(CacheError::NotFound("y".into()))
        );
    }

    #[test]
    fn test_opaque_values() {
        let cache = plain();

        cache.set("s", String::from("hello"), Expiration::Never);
        cache.set("v", Value::opaque(vec![1_u32, 2, 3]), Expiration::Never);

        let s = cache.get("s").unwrap();
        assert_eq!(s.downcast_ref::<String>().map(String::as_str), Some("hello"));

        let v = cache.get("v").unwrap();
        assert_eq!(v.downcast_ref::<Vec<u32>>(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_eviction_hook_on_delete() {
        let cache = plain();
        let evicted = recording(&cache);

        cache.set("a", 1_i32, Expiration::Never);
        cache.set("a", 2_i32, Expiration::Never);
        assert!(evicted.lock().unwrap().is_empty());

        cache.delete("a");
        cache.delete("a");
        cache.delete("never-there");

        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("a".to_owned(), Value::I32(2))]
        );
    }

    #[test]
    fn test_eviction_hook_on_sweep() {
        let cache = plain();
        let evicted = recording(&cache);

        cache.set("short", 1_i32, Duration::from_millis(5));
        cache.set("long", 2_i32, Duration::from_secs(60));
        cache.set("forever", 3_i32, Expiration::Never);
        sleep(Duration::from_millis(15));

        assert_eq!(cache.delete_expired(), 1);
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("short".to_owned(), Value::I32(1))]
        );
        assert_eq!(cache.item_count(), 2);

        assert_eq!(cache.delete_expired(), 0);
        assert_eq!(evicted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_on_evicted() {
        let cache = plain();
        let evicted = recording(&cache);

        cache.remove_on_evicted();
        cache.set("a", 1_i32, Expiration::Never);
        cache.delete("a");

        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hook_may_reenter_cache() {
        let cache = Arc::new(plain());
        let weak = Arc::downgrade(&cache);

        cache.on_evicted(move |key, _| {
            if let Some(cache) = weak.upgrade() {
                cache.set(format!("{}-tombstone", key), true as u8, Expiration::Never);
            }
        });

        cache.set("a", 1_i32, Duration::from_millis(5));
        sleep(Duration::from_millis(15));
        cache.delete_expired();

        assert_eq!(cache.get("a-tombstone"), Some(Value::U8(1)));
    }

    #[test]
    fn test_sweep_completeness() {
        let cache = plain();

        for i in 0..100 {
            let expiration = if i % 2 == 0 {
                Expiration::After(Duration::from_millis(5))
            } else {
                Expiration::Never
            };
            cache.set(format!("k{}", i), i as i64, expiration);
        }
        sleep(Duration::from_millis(15));

        assert_eq!(cache.delete_expired(), 50);

        let now = Instant::now();
        let items = cache.items();
        assert_eq!(items.len(), 50);
        assert!(items.values().all(|item| !item.is_expired_at(now)));
    }

    #[test]
    fn test_items_skips_expired_without_removing() {
        let cache = plain();

        cache.set("live", 1_i32, Expiration::Never);
        cache.set("dead", 2_i32, Duration::from_millis(5));
        sleep(Duration::from_millis(15));

        let items = cache.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items["live"].value, Value::I32(1));

        // still physically there.
        assert_eq!(cache.shared.storage.len(), 2);
        assert_eq!(cache.item_count(), 2);
    }

    #[test]
    fn test_item_count_is_approximate() {
        let cache = plain();

        cache.set("a", 1_i32, Expiration::Never);
        cache.set("a", 2_i32, Expiration::Never);
        assert_eq!(cache.item_count(), 2);

        // without a hook, deleting a missing key still counts down.
        cache.delete("missing");
        assert_eq!(cache.item_count(), 1);

        let _evicted = recording(&cache);
        cache.delete("missing");
        assert_eq!(cache.item_count(), 1);
    }

    #[test]
    fn test_flush() {
        let cache = plain();
        let evicted = recording(&cache);

        for i in 0..10 {
            cache.set(format!("k{}", i), i as u32, Expiration::Never);
        }
        cache.flush();

        assert_eq!(cache.item_count(), 0);
        assert!(cache.items().is_empty());
        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_items_round_trip() {
        let cache = plain();
        cache.set("a", 1_i32, Expiration::Never);
        cache.set("b", 2_i32, Duration::from_secs(60));

        let snapshot = cache.items();
        let restored = Cache::from_items(CacheConfig::default(), snapshot);

        assert_eq!(restored.item_count(), 2);
        assert_eq!(restored.get("a"), Some(Value::I32(1)));
        assert_eq!(
            restored.get_with_expiration("b"),
            cache.get_with_expiration("b")
        );
    }

    #[test]
    fn test_from_items_keeps_expired_until_swept() {
        let past = Instant::now();
        sleep(Duration::from_millis(5));

        let mut items = HashMap::new();
        items.insert("old".to_owned(), Item::new(Value::from(1_i32), Some(past)));
        let cache = Cache::from_items(CacheConfig::default(), items);

        assert_eq!(cache.get("old"), None);
        assert_eq!(cache.item_count(), 1);
        assert_eq!(cache.delete_expired(), 1);
    }

    #[test]
    fn test_janitor_sweeps() {
        let cache = Cache::new(Duration::from_millis(10), Duration::from_millis(10));
        assert!(cache.has_janitor());
        let evicted = recording(&cache);

        cache.set_default("a", 1_i32);
        cache.set("b", 2_i32, Expiration::Never);
        sleep(Duration::from_millis(100));

        assert_eq!(cache.item_count(), 1);
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("a".to_owned(), Value::I32(1))]
        );
    }

    #[test]
    fn test_stop_janitor_is_idempotent() {
        let cache = Cache::new(Duration::from_millis(5), Duration::from_millis(5));

        cache.stop_janitor();
        cache.stop_janitor();
        assert!(!cache.has_janitor());

        cache.set_default("a", 1_i32);
        sleep(Duration::from_millis(30));

        // nothing sweeps anymore, but reads still hide it.
        assert_eq!(cache.item_count(), 1);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_drop_stops_janitor() {
        let cache = Cache::new(Duration::from_millis(5), Duration::from_millis(5));
        let evicted = recording(&cache);
        let shared = Arc::clone(&cache.shared);

        drop(cache);

        shared.write("a".to_owned(), Value::from(1_i32), Expiration::Default);
        sleep(Duration::from_millis(40));

        assert_eq!(shared.storage.len(), 1);
        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drop_on_janitor_thread() {
        let cache = Arc::new(Cache::new(Duration::from_millis(5), Duration::from_millis(5)));
        let weak = Arc::downgrade(&cache);

        let (upgraded_tx, upgraded_rx) = channel::bounded(1);
        let (released_tx, released_rx) = channel::bounded::<()>(1);
        let (dropped_tx, dropped_rx) = channel::bounded(1);

        let hook_weak = weak.clone();
        cache.on_evicted(move |_, _| {
            if let Some(cache) = hook_weak.upgrade() {
                let _ = upgraded_tx.send(());
                let _ = released_rx.recv_timeout(Duration::from_secs(1));

                // the last strong handle goes away here, on the janitor thread.
                drop(cache);
                let _ = dropped_tx.send(());
            }
        });

        cache.set_default("a", 1_i32);
        upgraded_rx.recv_timeout(Duration::from_secs(1)).unwrap();

        drop(cache);
        released_tx.send(()).unwrap();

        assert!(dropped_rx.recv_timeout(Duration::from_secs(1)).is_ok());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_sweep_keeps_entries_set_again() {
        let cache = Arc::new(plain());
        let evicted = recording(&cache);

        for round in 0..5 {
            for i in 0..2000 {
                cache.set(format!("k{}", i), 0_i32, Duration::from_millis(1));
            }
            sleep(Duration::from_millis(5));

            let writer = {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..2000 {
                        cache.set(format!("k{}", i), 1_i32, Expiration::Never);
                    }
                })
            };
            cache.delete_expired();
            writer.join().unwrap();

            for i in 0..2000 {
                assert_eq!(
                    cache.get(&format!("k{}", i)),
                    Some(Value::I32(1)),
                    "round {} key k{}",
                    round,
                    i
                );
            }
            assert!(evicted
                .lock()
                .unwrap()
                .iter()
                .all(|(_, v)| *v == Value::I32(0)));
        }
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(Cache::new(Duration::from_millis(5), Duration::from_millis(2)));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("{}-{}", t, i % 50);
                        cache.set_default(key.clone(), i as i64);
                        let _ = cache.get(&key);
                        if i % 7 == 0 {
                            cache.delete(&key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        sleep(Duration::from_millis(10));
        cache.delete_expired();
        assert!(cache.items().is_empty());
    }
}
