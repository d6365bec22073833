use std::time::{Duration, Instant};

/// How long a newly written entry lives.
///
/// # Examples
///
/// ```
/// use adrenaline::Expiration;
/// use std::time::Duration;
///
/// // zero is the same as asking for the cache's default.
/// assert_eq!(Expiration::from(Duration::ZERO), Expiration::Default);
/// assert_eq!(
///     Expiration::from(Duration::from_secs(1)),
///     Expiration::After(Duration::from_secs(1))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Use the default expiration the cache was built with.
    Default,
    /// The entry never expires.
    Never,
    /// The entry expires once this much time has passed.
    After(Duration),
}

impl Default for Expiration {
    fn default() -> Self {
        Expiration::Default
    }
}

impl From<Duration> for Expiration {
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Expiration::Default
        } else {
            Expiration::After(duration)
        }
    }
}

/// Computes the absolute expiration of an entry written at `now`.
///
/// `default` is the cache-wide default. `None` there means entries requesting
/// the default never expire.
pub(crate) fn expires_at(
    now: Instant,
    expiration: Expiration,
    default: Option<Duration>,
) -> Option<Instant> {
    let duration = match expiration {
        Expiration::Default => default?,
        Expiration::Never => return None,
        Expiration::After(d) if d.is_zero() => default?,
        Expiration::After(d) => d,
    };

    if duration.is_zero() {
        return None;
    }

    // an instant that cannot be represented is as good as never.
    now.checked_add(duration)
}

/// An entry is still live at the exact instant it expires.
#[inline]
pub(crate) fn is_expired(expires_at: Option<Instant>, now: Instant) -> bool {
    match expires_at {
        Some(at) => now > at,
        None => false,
    }
}
