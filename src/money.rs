//! Fixed-precision money arithmetic shared by counts and receptions.
//!
//! Every amount the service stores or compares passes through [`round2`].
//! Rounding is half-away-from-zero so that a half-cent discrepancy is never
//! flattened into "no difference".

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to two fraction digits (half away from zero).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Difference between an expected and an actual amount.
///
/// Positive result means the expected/target amount exceeds the actual one,
/// i.e. a shortfall.
pub fn difference(expected: Decimal, actual: Decimal) -> Decimal {
    round2(expected - actual)
}

/// Whether a difference is large enough to require a justification comment.
/// The boundary is strict: a difference exactly at the threshold passes.
pub fn exceeds_threshold(diff: Decimal, threshold: Decimal) -> bool {
    diff.abs() > threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(dec!(2.005)), dec!(2.01));
        assert_eq!(round2(dec!(-2.005)), dec!(-2.01));
        assert_eq!(round2(dec!(2.004)), dec!(2.00));
    }

    #[test]
    fn difference_rounds_and_keeps_sign() {
        assert_eq!(difference(dec!(100.00), dec!(97.995)), dec!(2.01));
        assert_eq!(difference(dec!(50.005), dec!(50.00)), dec!(0.01));
        assert_eq!(difference(dec!(40.00), dec!(40.00)), dec!(0.00));
        assert_eq!(difference(dec!(10.00), dec!(12.50)), dec!(-2.50));
    }

    #[test]
    fn threshold_boundary_is_strict() {
        let threshold = dec!(2.00);
        assert!(exceeds_threshold(dec!(2.01), threshold));
        assert!(exceeds_threshold(dec!(-2.01), threshold));
        assert!(!exceeds_threshold(dec!(2.00), threshold));
        assert!(!exceeds_threshold(dec!(-2.00), threshold));
        assert!(!exceeds_threshold(dec!(0.00), threshold));
    }
}
