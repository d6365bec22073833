use crate::policy;
use crate::value::Value;

use std::time::Instant;

/// A stored value together with its absolute expiration time.
///
/// `expires_at` is `None` when the item never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Item {
    pub fn new(value: Value, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Creates an item that never expires.
    pub fn permanent(value: Value) -> Self {
        Self::new(value, None)
    }

    /// Returns true if the item has expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        policy::is_expired(self.expires_at, now)
    }

    /// Returns true if the item has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Returns the value if the item is still live at `now`.
    #[inline]
    pub(crate) fn live_value(&self, now: Instant) -> Option<&Value> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(&self.value)
        }
    }
}
