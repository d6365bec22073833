use once_cell::sync::Lazy;

use std::thread;
use std::time::Duration;

static DEFAULT_SHARDS: Lazy<usize> = Lazy::new(|| {
    let cpus = thread::available_parallelism().map_or(1, |n| n.get());
    (cpus * 4).next_power_of_two().min(64)
});

/// Tuning parameters for a [`Cache`](crate::Cache).
///
/// # Examples
///
/// ```
/// use adrenaline::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_default_expiration(Duration::from_secs(300))
///     .with_cleanup_interval(Duration::from_secs(60));
///
/// assert_eq!(config.default_expiration, Some(Duration::from_secs(300)));
/// assert_eq!(config.cleanup_interval, Some(Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of entries written with [`Expiration::Default`].
    /// `None` means those entries never expire.
    ///
    /// [`Expiration::Default`]: crate::Expiration::Default
    pub default_expiration: Option<Duration>,

    /// How often the janitor sweeps expired entries. `None` means no janitor
    /// is started and expired entries are only reclaimed on read or by
    /// [`Cache::delete_expired`](crate::Cache::delete_expired).
    pub cleanup_interval: Option<Duration>,

    /// Number of independently locked shards of the underlying map.
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_expiration: None,
            cleanup_interval: None,
            shards: *DEFAULT_SHARDS,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default expiration. A zero duration means "never expire".
    pub fn with_default_expiration(mut self, expiration: Duration) -> Self {
        self.default_expiration = non_zero(expiration);
        self
    }

    /// Sets the janitor interval. A zero duration disables the janitor.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = non_zero(interval);
        self
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    /// Drops zero durations that were assigned to the fields directly.
    pub(crate) fn normalized(mut self) -> Self {
        self.default_expiration = self.default_expiration.and_then(non_zero);
        self.cleanup_interval = self.cleanup_interval.and_then(non_zero);
        self.shards = self.shards.max(1);
        self
    }
}

#[inline]
fn non_zero(d: Duration) -> Option<Duration> {
    if d.is_zero() {
        None
    } else {
        Some(d)
    }
}
