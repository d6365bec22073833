//! Adrenaline is a concurrent key-value cache where every entry carries its own
//! optional expiration time.
//!
//! It is meant as a drop-in replacement for a concurrent map when entries need
//! a time to live, without scheduling a timer per key.
//! - Expired entries are never returned. Reads check expiration lazily.
//! - A background janitor sweeps expired entries every `cleanup_interval`.
//! - An eviction hook can observe entries removed by deletion or sweeping.
//! - Numeric values can be incremented and decremented in place.
//!
//! # Examples
//! ```
//! use std::thread::sleep;
//! use std::time::Duration;
//!
//! use adrenaline::{Cache, Expiration, Value};
//!
//! fn main() {
//!     let cache = Cache::new(Duration::from_secs(60), Duration::from_secs(1));
//!
//!     cache.set("Still", "Alive", Duration::from_secs(3));
//!     cache.set("Gonna", "Die", Duration::from_millis(100));
//!     cache.set("counter", 0_u64, Expiration::Never);
//!
//!     sleep(Duration::from_millis(200));
//!
//!     assert!(cache.get("Still").is_some());
//!     assert!(cache.get("Gonna").is_none());
//!
//!     cache.increment_u64("counter", 1).unwrap();
//!     assert_eq!(cache.get("counter"), Some(Value::U64(1)));
//!
//!     cache.stop_janitor();
//! }
//! ```
//!
//! [`Cache::item_count`] is an approximation. Overwrites of an existing key
//! count as new inserts and expired entries count until they are swept.

// for internal use.
pub(crate) mod counter;
pub(crate) mod hash;
pub(crate) mod janitor;
pub(crate) mod storage;

// for external use.
mod cache;
mod config;
mod error;
mod item;
mod numeric;
mod policy;
mod value;

#[doc(inline)]
pub use crate::cache::{Cache, EvictionHook};

pub use crate::config::CacheConfig;
pub use crate::error::{CacheError, Result};
pub use crate::item::Item;
pub use crate::numeric::Numeric;
pub use crate::policy::Expiration;
pub use crate::value::{Uintptr, Value, ValueKind};
