//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without
//! recompiling. Every value is validated before the run starts; a bad
//! value aborts instead of producing degenerate learning behavior.

use bevy_ecs::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::SimError;
use crate::systems::preference::LearningParams;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
    pub coverage: CoverageConfig,
    pub learning: LearningConfig,
}

/// Run-control parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub steps: u64,
    pub seed: u64,
    pub snapshot_interval: u64,
}

/// Grid and population sizes
#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    pub grid_size: u32,
    pub num_uavs: usize,
    pub num_users: usize,
}

/// Coverage model parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageConfig {
    /// Maximum distance at which a UAV can serve a user
    pub coverage_radius: f64,
    /// Signal-quality threshold. Kept on the tuning surface for
    /// experiments, but assignment gates on distance alone.
    pub snr_threshold: f64,
}

/// Learning and policy parameters
#[derive(Debug, Clone, Deserialize)]
pub struct LearningConfig {
    pub learning_rate: f64,
    /// Inverse temperature of the softmax policy; 0 is uniform
    pub beta: f64,
    /// Look-ahead horizon T (simulated steps per candidate action)
    pub horizon: u32,
    /// Grid units moved per unit of action displacement
    pub step_size: f64,
    /// The ordered action catalogue, `(dx, dy)` per entry
    pub actions: Vec<[f64; 2]>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SimError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| SimError::Parse(e.to_string()))
    }

    /// Load configuration from the given path, or fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load {}: {}. Using defaults.",
                path.as_ref().display(),
                e
            );
            Self::default()
        })
    }

    /// Check every tuning value the engine depends on. Zero learning rate
    /// and zero beta are legal (no-op update, uniform policy); negative or
    /// non-finite values are not.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));

        if self.world.grid_size == 0 {
            return invalid("grid_size must be positive".into());
        }
        if !(self.coverage.coverage_radius > 0.0) || !self.coverage.coverage_radius.is_finite() {
            return invalid(format!(
                "coverage_radius must be positive and finite, got {}",
                self.coverage.coverage_radius
            ));
        }
        if !self.coverage.snr_threshold.is_finite() {
            return invalid(format!(
                "snr_threshold must be finite, got {}",
                self.coverage.snr_threshold
            ));
        }
        if self.learning.learning_rate < 0.0 || !self.learning.learning_rate.is_finite() {
            return invalid(format!(
                "learning_rate must be non-negative and finite, got {}",
                self.learning.learning_rate
            ));
        }
        if self.learning.beta < 0.0 || !self.learning.beta.is_finite() {
            return invalid(format!(
                "beta must be non-negative and finite, got {}",
                self.learning.beta
            ));
        }
        if self.learning.horizon == 0 {
            return invalid("horizon must be at least 1".into());
        }
        if !(self.learning.step_size > 0.0) || !self.learning.step_size.is_finite() {
            return invalid(format!(
                "step_size must be positive and finite, got {}",
                self.learning.step_size
            ));
        }
        if self.learning.actions.is_empty() {
            return invalid("action set must not be empty".into());
        }
        if self
            .learning
            .actions
            .iter()
            .any(|d| !d[0].is_finite() || !d[1].is_finite())
        {
            return invalid("action displacements must be finite".into());
        }
        Ok(())
    }

    /// The learner's view of this configuration
    pub fn learning_params(&self) -> LearningParams {
        LearningParams {
            coverage_radius: self.coverage.coverage_radius,
            grid_size: self.world.grid_size as f64,
            learning_rate: self.learning.learning_rate,
            horizon: self.learning.horizon,
            step_size: self.learning.step_size,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                steps: 200,
                seed: 42,
                snapshot_interval: 20,
            },
            world: WorldConfig {
                grid_size: 100,
                num_uavs: 3,
                num_users: 20,
            },
            coverage: CoverageConfig {
                coverage_radius: 20.0,
                snr_threshold: 0.04,
            },
            learning: LearningConfig {
                learning_rate: 0.1,
                beta: 1.0,
                horizon: 1,
                step_size: 10.0,
                actions: vec![
                    [0.0, 0.0],
                    [1.0, 0.0],
                    [-1.0, 0.0],
                    [0.0, 1.0],
                    [0.0, -1.0],
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning.actions[0], [0.0, 0.0]); // stay option
        assert_eq!(config.learning.actions.len(), 5);
    }

    #[test]
    fn test_zero_radius_rejected() {
        let mut config = Config::default();
        config.coverage.coverage_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_learning_rate_accepted() {
        let mut config = Config::default();
        config.learning.learning_rate = 0.0;
        assert!(config.validate().is_ok());

        config.learning.learning_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_action_set_rejected() {
        let mut config = Config::default();
        config.learning.actions.clear();
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_grid_and_horizon_rejected() {
        let mut config = Config::default();
        config.world.grid_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.learning.horizon = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_from_toml() {
        let toml_str = r#"
            [simulation]
            steps = 50
            seed = 7
            snapshot_interval = 10

            [world]
            grid_size = 60
            num_uavs = 2
            num_users = 8

            [coverage]
            coverage_radius = 15.0
            snr_threshold = 0.05

            [learning]
            learning_rate = 0.2
            beta = 2.0
            horizon = 3
            step_size = 10.0
            actions = [[0.0, 0.0], [1.0, 0.0]]
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.grid_size, 60);
        assert_eq!(config.learning.horizon, 3);
        assert_eq!(config.learning.actions.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
