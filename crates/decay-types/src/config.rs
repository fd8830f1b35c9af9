// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Collaborator Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{DecayError, DecayResult};

/// Runtime configuration for the decay collaborator.
///
/// Only numerical knobs live here. Nothing in it changes the wire
/// layout of transferable types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Environment variable consulted by `Database::from_env`.
    /// Default: "DECAY_DATABASE_PATH".
    pub database_env_var: String,

    /// Time slices used when a caller asks for interval counts without
    /// choosing one.
    /// Default: 100.
    pub characteristic_time_slices: usize,

    /// Spectrum lines closer than this (keV) are merged into one.
    /// Default: 1e-6.
    pub energy_merge_tolerance_kev: f64,

    /// Relative separation applied to coincident decay constants in the
    /// Bateman decomposition.
    /// Default: 1e-9.
    pub degenerate_lambda_epsilon: f64,

    /// Whether `photons` includes annihilation radiation.
    /// Default: true.
    pub include_annihilations_in_photons: bool,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            database_env_var: "DECAY_DATABASE_PATH".to_string(),
            characteristic_time_slices: 100,
            energy_merge_tolerance_kev: 1e-6,
            degenerate_lambda_epsilon: 1e-9,
            include_annihilations_in_photons: true,
        }
    }
}

impl DecayConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> DecayResult<()> {
        if self.database_env_var.is_empty() {
            return Err(DecayError::Config(
                "database_env_var must not be empty".to_string(),
            ));
        }
        if self.characteristic_time_slices < 1 {
            return Err(DecayError::Config(format!(
                "characteristic_time_slices must be >= 1, got {}",
                self.characteristic_time_slices
            )));
        }
        if !(self.energy_merge_tolerance_kev >= 0.0 && self.energy_merge_tolerance_kev.is_finite())
        {
            return Err(DecayError::Config(format!(
                "energy_merge_tolerance_kev must be finite and >= 0, got {}",
                self.energy_merge_tolerance_kev
            )));
        }
        if !(self.degenerate_lambda_epsilon > 0.0 && self.degenerate_lambda_epsilon < 1e-3) {
            return Err(DecayError::Config(format!(
                "degenerate_lambda_epsilon must be in (0, 1e-3), got {}",
                self.degenerate_lambda_epsilon
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DecayResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DecayError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DecayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_slices_rejected() {
        let cfg = DecayConfig {
            characteristic_time_slices: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("characteristic_time_slices"));
    }

    #[test]
    fn test_nan_tolerance_rejected() {
        let cfg = DecayConfig {
            energy_merge_tolerance_kev: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = DecayConfig::from_json(r#"{"characteristic_time_slices": 8}"#).unwrap();
        assert_eq!(cfg.characteristic_time_slices, 8);
        assert_eq!(cfg.database_env_var, "DECAY_DATABASE_PATH");
        assert!(cfg.include_annihilations_in_photons);
    }

    #[test]
    fn test_from_json_garbage() {
        let err = DecayConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, DecayError::Config(_)));
    }
}
