use super::Cache;

use crate::error::{CacheError, Result};
use crate::item::Item;
use crate::numeric::{apply, Numeric, Op};
use crate::value::{Uintptr, Value};

use tracing::trace;

use std::time::Instant;

impl Cache {
    /// Reads the live entry for `key`, lets `f` compute a replacement value and
    /// writes it back with the entry's original expiration.
    fn rewrite<T, F>(&self, key: &str, op: Op, expected: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Value) -> Option<(Value, T)>,
    {
        let item = match self.shared.storage.load(key) {
            Some(item) if !item.is_expired_at(Instant::now()) => item,
            _ => return Err(CacheError::NotFound(key.to_owned())),
        };

        let (value, out) = f(&item.value).ok_or_else(|| CacheError::TypeMismatch {
            key: key.to_owned(),
            found: item.value.kind(),
            expected,
        })?;

        trace!(key, op = op.name(), kind = %value.kind(), "rewriting value");
        self.shared
            .store(key.to_owned(), Item::new(value, item.expires_at));
        Ok(out)
    }

    fn offset_as<T: Numeric>(&self, key: &str, op: Op, n: T) -> Result<T> {
        self.rewrite(key, op, T::KIND.name(), |value| {
            T::extract(value).map(|cur| {
                let next = apply(cur, op, n);
                (next.into_value(), next)
            })
        })
    }

    /// Adds `n` to a value stored with exactly the kind `T`, returning the new
    /// value. The entry keeps its expiration.
    ///
    /// # Examples
    ///
    /// ```
    /// use adrenaline::{Cache, CacheError, Expiration, ValueKind};
    /// use std::time::Duration;
    ///
    /// let cache = Cache::new(Duration::ZERO, Duration::ZERO);
    /// cache.set("n", 1_u16, Expiration::Never);
    ///
    /// assert_eq!(cache.increment_as::<u16>("n", 2), Ok(3));
    /// assert_eq!(
    ///     cache.increment_as::<u32>("n", 2),
    ///     Err(CacheError::TypeMismatch {
    ///         key: "n".into(),
    ///         found: ValueKind::U16,
    ///         expected: "u32",
    ///     })
    /// );
    /// ```
    pub fn increment_as<T: Numeric>(&self, key: &str, n: T) -> Result<T> {
        self.offset_as(key, Op::Add, n)
    }

    /// Subtracts `n` from a value stored with exactly the kind `T`, returning
    /// the new value. The entry keeps its expiration.
    pub fn decrement_as<T: Numeric>(&self, key: &str, n: T) -> Result<T> {
        self.offset_as(key, Op::Sub, n)
    }

    /// Adds `n` to any numeric value.
    ///
    /// `n` is cast to the stored kind first, so it wraps for narrower integers
    /// and is rounded for floating point values.
    ///
    /// # Examples
    ///
    /// ```
    /// use adrenaline::{Cache, Expiration, Value};
    /// use std::time::Duration;
    ///
    /// let cache = Cache::new(Duration::ZERO, Duration::ZERO);
    /// cache.set("byte", 250_u8, Expiration::Never);
    /// cache.set("float", 0.5_f64, Expiration::Never);
    ///
    /// cache.increment("byte", 10).unwrap();
    /// cache.increment("float", 2).unwrap();
    ///
    /// assert_eq!(cache.get("byte"), Some(Value::U8(4)));
    /// assert_eq!(cache.get("float"), Some(Value::F64(2.5)));
    /// ```
    pub fn increment(&self, key: &str, n: i64) -> Result<()> {
        self.rewrite(key, Op::Add, "an integer or float", |value| {
            value.offset_by(n, Op::Add).map(|next| (next, ()))
        })
    }

    /// Subtracts `n` from any numeric value. See [`Cache::increment`].
    pub fn decrement(&self, key: &str, n: i64) -> Result<()> {
        self.rewrite(key, Op::Sub, "an integer or float", |value| {
            value.offset_by(n, Op::Sub).map(|next| (next, ()))
        })
    }

    /// Adds `n` to an `f32` or `f64` value.
    pub fn increment_float(&self, key: &str, n: f64) -> Result<()> {
        self.rewrite(key, Op::Add, "f32 or f64", |value| {
            value.offset_by_float(n, Op::Add).map(|next| (next, ()))
        })
    }

    /// Subtracts `n` from an `f32` or `f64` value.
    pub fn decrement_float(&self, key: &str, n: f64) -> Result<()> {
        self.rewrite(key, Op::Sub, "f32 or f64", |value| {
            value.offset_by_float(n, Op::Sub).map(|next| (next, ()))
        })
    }

    pub fn increment_uintptr(&self, key: &str, n: usize) -> Result<usize> {
        self.increment_as(key, Uintptr(n)).map(|v| v.0)
    }

    pub fn decrement_uintptr(&self, key: &str, n: usize) -> Result<usize> {
        self.decrement_as(key, Uintptr(n)).map(|v| v.0)
    }
}

macro_rules! typed_offsets {
    ($($ty:ty => $inc:ident, $dec:ident;)*) => {
        impl Cache {
            $(
                #[doc = concat!("Adds `n` to a `", stringify!($ty), "` value, returning the new value.")]
                #[inline]
                pub fn $inc(&self, key: &str, n: $ty) -> Result<$ty> {
                    self.increment_as(key, n)
                }

                #[doc = concat!("Subtracts `n` from a `", stringify!($ty), "` value, returning the new value.")]
                #[inline]
                pub fn $dec(&self, key: &str, n: $ty) -> Result<$ty> {
                    self.decrement_as(key, n)
                }
            )*
        }
    };
}

typed_offsets! {
    i8 => increment_i8, decrement_i8;
    i16 => increment_i16, decrement_i16;
    i32 => increment_i32, decrement_i32;
    i64 => increment_i64, decrement_i64;
    isize => increment_isize, decrement_isize;
    u8 => increment_u8, decrement_u8;
    u16 => increment_u16, decrement_u16;
    u32 => increment_u32, decrement_u32;
    u64 => increment_u64, decrement_u64;
    usize => increment_usize, decrement_usize;
    f32 => increment_f32, decrement_f32;
    f64 => increment_f64, decrement_f64;
}
