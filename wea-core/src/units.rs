//! Temperature scales and display rounding.

use serde::{Deserialize, Serialize};

/// Zero Kelvin expressed in degrees Celsius.
pub const ABSOLUTE_ZERO_CELSIUS: f64 = -273.15;

/// Number of decimal digits kept in displayed temperatures.
pub const DISPLAY_PRECISION: i32 = 2;

/// Rounds `n` to `precision` digits after the decimal point.
///
/// Ties are rounded away from zero, so `round(2.5, 0) == 3.0` and
/// `round(-2.5, 0) == -3.0`.
pub fn round(n: f64, precision: i32) -> f64 {
    let m = 10f64.powi(precision);
    (n * m).round() / m
}

/// Temperature on the absolute scale, as reported by the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

impl Kelvin {
    /// Converts to degrees Celsius rounded for display.
    pub fn celsius(self) -> f64 {
        round(self.0 + ABSOLUTE_ZERO_CELSIUS, DISPLAY_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_keeps_requested_digits() {
        assert_eq!(round(123.45678, 0), 123.0);
        assert_eq!(round(123.45678, 2), 123.46);
        assert_eq!(round(0.1, 3), 0.1);
    }

    #[test]
    fn round_ties_go_away_from_zero() {
        assert_eq!(round(2.5, 0), 3.0);
        assert_eq!(round(-2.5, 0), -3.0);
        assert_eq!(round(-0.125, 2), -0.13);
        assert_eq!(round(0.125, 2), 0.13);
    }

    #[test]
    fn kelvin_to_display_celsius() {
        assert_eq!(Kelvin(300.0).celsius(), 26.85);
        assert_eq!(Kelvin(273.15).celsius(), 0.0);
        assert_eq!(Kelvin(0.0).celsius(), -273.15);
        assert_eq!(Kelvin(250.004).celsius(), -23.15);
    }

    #[test]
    fn celsius_matches_reference_formula() {
        for raw in [0.0, 1.5, 100.0, 255.372, 273.149, 288.15, 310.987, 1000.0] {
            let expected = ((raw - 273.15) * 100.0_f64).round() / 100.0;
            assert_eq!(Kelvin(raw).celsius(), expected, "raw = {raw}");
        }
    }

    #[test]
    fn conversion_is_deterministic() {
        let first = Kelvin(291.337).celsius();
        for _ in 0..100 {
            assert_eq!(Kelvin(291.337).celsius(), first);
        }
    }
}
