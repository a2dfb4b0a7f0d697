//! Simulation settings.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::SimulatedData;
use crate::error::{BnResult, ValidationError};
use crate::evidence::Evidence;
use crate::network::Network;

use super::driver::simulate;

/// Conservative upper bound on the number of generated rows.
pub const MAX_ROWS: usize = 100_000_000;

/// Rows generated when none are requested.
pub const DEFAULT_ROWS: usize = 1000;

/// Everything needed to run a simulation apart from the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rows to generate.
    pub rows: usize,
    /// Seed for the generator; fresh OS entropy when absent.
    pub seed: Option<u64>,
    /// Emit per-node debug events.
    pub trace: bool,
    /// Fixed nodes.
    pub evidence: Evidence,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: None,
            trace: false,
            evidence: Evidence::new(),
        }
    }
}

impl SimulationConfig {
    /// Validate the config on its own.
    ///
    /// Whether the evidence fits the network is checked when the run starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rows > MAX_ROWS {
            return Err(ValidationError::InvalidConfig {
                reason: format!("rows must be <= {MAX_ROWS}, got {}", self.rows),
            });
        }
        self.evidence.validate()
    }

    /// Parses and validates a config from JSON.
    pub fn from_json(json: &str) -> BnResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Runs the simulation with a generator seeded from this config.
    pub fn run(&self, network: &Network) -> BnResult<SimulatedData> {
        self.validate()?;
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        simulate(network, self.rows, &self.evidence, &mut rng, self.trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::FixedValue;

    #[test]
    fn default_config_is_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_too_many_rows() {
        let config = SimulationConfig {
            rows: MAX_ROWS + 1,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_evidence() {
        let config = SimulationConfig {
            evidence: Evidence::new().fix("G", FixedValue::interval(1.0, 0.0)),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFixedValue { .. })
        ));
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = SimulationConfig::from_json(
            r#"{"rows": 50, "seed": 9, "evidence": {"A": {"kind": "levels", "value": ["x", 1]}}}"#,
        )
        .unwrap();
        assert_eq!(config.rows, 50);
        assert_eq!(config.seed, Some(9));
        assert!(!config.trace);
        assert_eq!(
            config.evidence.get("A"),
            Some(&FixedValue::levels([
                crate::evidence::LevelRef::from("x"),
                crate::evidence::LevelRef::from(1usize),
            ]))
        );
    }

    #[test]
    fn from_json_rejects_unknown_shape() {
        assert!(SimulationConfig::from_json(r#"{"rows": "many"}"#).is_err());
    }
}
