//! Simulation configuration with documented defaults
//!
//! Construction parameters (grid shape and population mix) and run
//! parameters (policy, budget, seed) live together so a single TOML file
//! describes a reproducible run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SchellingError};
use crate::policy::RelocationPolicy;

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === BOARD ===
    /// Length of one side of the square board (cells)
    pub side_length: usize,

    /// Share of all cells that start empty
    ///
    /// Movers can only relocate into empty cells, so this bounds how much
    /// freedom every policy has. At 0.0 nobody can ever move.
    pub empty_fraction: f64,

    /// Share of the *occupied* cells that are TypeA; the rest are TypeB
    pub type_a_fraction: f64,

    /// Same-type neighbor share at or above which an agent is satisfied
    ///
    /// A threshold of 0.0 satisfies everyone immediately; 1.0 requires a
    /// fully homogeneous occupied neighborhood.
    pub threshold: f64,

    /// Minimum unsatisfied count for closest-search policies
    ///
    /// Closest-search policies refuse to move once fewer than this many
    /// agents remain unsatisfied. The last few hard cases otherwise
    /// shuffle back and forth between the same nearby vacancies.
    /// Keep in the 5-20 range when running closest policies; 1 disables it.
    pub stopping_floor: usize,

    // === RUN ===
    /// Seed for the single ChaCha8 stream used by construction and every policy
    pub seed: u64,

    /// Maximum number of external steps the driver will execute
    pub max_iterations: usize,

    /// One of the 18 relocation policy identifiers (e.g. "batchRandom")
    pub policy: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            side_length: 50,
            empty_fraction: 0.1,
            type_a_fraction: 0.5,
            threshold: 0.6,
            stopping_floor: 1,
            seed: 12345,
            max_iterations: 100,
            policy: "batchRandom".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// The policy this config names
    pub fn relocation_policy(&self) -> Result<RelocationPolicy> {
        self.policy.parse()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.side_length == 0 {
            return Err(SchellingError::DegenerateConfiguration(
                "side_length must be positive".into(),
            ));
        }

        for (name, value) in [
            ("empty_fraction", self.empty_fraction),
            ("type_a_fraction", self.type_a_fraction),
            ("threshold", self.threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SchellingError::DegenerateConfiguration(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, value
                )));
            }
        }

        if self.stopping_floor == 0 {
            return Err(SchellingError::InvalidConfig(
                "stopping_floor must be at least 1".into(),
            ));
        }

        self.relocation_policy()?;
        Ok(())
    }
}
