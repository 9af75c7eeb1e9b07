//! Indel length classes (small / mid / large).

use log::warn;
use std::fmt;

/// Inclusive length boundaries used to bucket indels.
///
/// Buckets are independent; with non-default boundaries an indel can fall into
/// none or several of them. Boundaries may be negative and a reversed mid range
/// is simply empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeClasses {
    /// `length <= small`
    pub small: i64,
    /// `mid.0 <= length <= mid.1`
    pub mid: (i64, i64),
    /// `length >= large`
    pub large: i64,
}

impl Default for SizeClasses {
    fn default() -> Self {
        SizeClasses {
            small: 1,
            mid: (2, 4),
            large: 5,
        }
    }
}

impl SizeClasses {
    /// Build the classes from raw command-line values.
    ///
    /// A value that is not a number logs a warning and falls back to its
    /// default; this never fails.
    pub fn from_raw(small: &str, mid: &str, large: &str) -> Self {
        let defaults = SizeClasses::default();

        let small = parse_length(small).unwrap_or_else(|| {
            warn!(
                "Small indel length '{}' is not a valid number, running as default ({})",
                small, defaults.small
            );
            defaults.small
        });

        let mid = parse_range(mid).unwrap_or_else(|| {
            warn!(
                "Mid indel length '{}' is not a 'lower,upper' pair, running as default ({},{})",
                mid, defaults.mid.0, defaults.mid.1
            );
            defaults.mid
        });

        let large = parse_length(large).unwrap_or_else(|| {
            warn!(
                "Large indel length '{}' is not a valid number, running as default ({})",
                large, defaults.large
            );
            defaults.large
        });

        SizeClasses { small, mid, large }
    }

    #[inline]
    pub fn is_small(&self, length: u32) -> bool {
        i64::from(length) <= self.small
    }

    #[inline]
    pub fn is_mid(&self, length: u32) -> bool {
        (self.mid.0..=self.mid.1).contains(&i64::from(length))
    }

    #[inline]
    pub fn is_large(&self, length: u32) -> bool {
        i64::from(length) >= self.large
    }
}

impl fmt::Display for SizeClasses {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "small<={} mid={}..={} large>={}",
            self.small, self.mid.0, self.mid.1, self.large
        )
    }
}

/// Lengths may be written as decimals (`"2.0"`); the fractional part is dropped.
fn parse_length(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then(|| value.trunc() as i64)
}

fn parse_range(raw: &str) -> Option<(i64, i64)> {
    let (lower, upper) = raw.split_once(',')?;
    Some((parse_length(lower)?, parse_length(upper)?))
}
