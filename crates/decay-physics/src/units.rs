// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Canonical Units and Constants
// ─────────────────────────────────────────────────────────────────────
//! Unit system of the collaborator.
//!
//! Base units: second, becquerel, keV, gram. Multiply by a constant to
//! convert into base units, divide to convert out of them:
//!
//! ```
//! use decay_physics::units::{CURIE, YEAR};
//! let activity_bq = 2.0 * CURIE;
//! let half_life_s = 30.08 * YEAR;
//! assert!(activity_bq > 7.0e10 && half_life_s > 9.0e8);
//! ```

pub const SECOND: f64 = 1.0;
pub const MINUTE: f64 = 60.0 * SECOND;
pub const HOUR: f64 = 60.0 * MINUTE;
pub const DAY: f64 = 24.0 * HOUR;
/// Julian year.
pub const YEAR: f64 = 365.25 * DAY;

pub const BECQUEREL: f64 = 1.0;
pub const CURIE: f64 = 3.7e10 * BECQUEREL;

pub const KEV: f64 = 1.0;
pub const MEV: f64 = 1000.0 * KEV;

/// Atoms per mole.
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Energy of each annihilation photon (electron rest mass).
pub const ANNIHILATION_ENERGY_KEV: f64 = 510.998_950 * KEV;

/// Decay constant λ = ln 2 / T½. Stable (infinite or non-positive
/// half-life) nuclides have λ = 0.
pub fn decay_constant(half_life: f64) -> f64 {
    if half_life.is_finite() && half_life > 0.0 {
        std::f64::consts::LN_2 / half_life
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_in_seconds() {
        assert!((YEAR - 31_557_600.0).abs() < 1e-6);
    }

    #[test]
    fn test_curie() {
        assert_eq!(CURIE, 3.7e10);
    }

    #[test]
    fn test_decay_constant_stable() {
        assert_eq!(decay_constant(f64::INFINITY), 0.0);
        assert_eq!(decay_constant(0.0), 0.0);
        assert_eq!(decay_constant(f64::NAN), 0.0);
    }

    #[test]
    fn test_decay_constant_half_life() {
        let lambda = decay_constant(10.0);
        assert!(((-lambda * 10.0).exp() - 0.5).abs() < 1e-12);
    }
}
