//! Numeric utilities: centralized integer conversions for log and bench lines.
//!
//! Prefer saturating conversions when clamping is safer than panicking or
//! truncating (e.g., converting a time span to u64 for metrics/logging).

#[inline]
#[must_use]
pub fn usize_to_u64(v: usize) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

#[inline]
#[must_use]
pub fn u128_to_u64_saturating(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usize_to_u64_is_lossless() {
        for &v in &[0usize, 1, 42, 10_000] {
            assert_eq!(usize_to_u64(v) as usize, v);
        }
    }

    #[test]
    fn u128_to_u64_saturating_edges() {
        assert_eq!(u128_to_u64_saturating(0), 0);
        assert_eq!(u128_to_u64_saturating(u128::from(u64::MAX)), u64::MAX);
        assert_eq!(u128_to_u64_saturating(u128::from(u64::MAX) + 1), u64::MAX);
        assert_eq!(u128_to_u64_saturating(u128::MAX), u64::MAX);
    }
}
