use tracing::debug;

use crate::infra::config::{read_var, read_vec3};
use crate::infra::{ConfigError, Envelope, ProcessEnv, VarSource};

use super::reward::GOAL_REACHED_BONUS;

/// How positions are written into observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservationMode {
    /// Simulator units. The declared [-1, 1] observation bounds are nominal only.
    #[default]
    Raw,
    /// Position and goal mapped from the working envelope onto [-1, 1] per axis.
    Normalized,
}

/// Environment configuration
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Goal sampling bounds
    pub envelope: Envelope,
    /// Maximum steps per episode
    pub max_steps: usize,
    /// Initial success radius, later driven by the curriculum
    pub distance_threshold: f32,
    /// Bonus added to the reward when the goal is reached
    pub goal_bonus: f32,
    pub observation_mode: ObservationMode,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            envelope: Envelope::default(),
            max_steps: 1000,
            distance_threshold: 3.9e-3,
            goal_bonus: GOAL_REACHED_BONUS,
            observation_mode: ObservationMode::Raw,
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.envelope.validate()?;

        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if !(self.distance_threshold.is_finite() && self.distance_threshold > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "distance_threshold",
                value: self.distance_threshold,
            });
        }
        if !(self.goal_bonus.is_finite() && self.goal_bonus >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "goal_bonus",
                range: "[0, inf)",
                value: self.goal_bonus,
            });
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&ProcessEnv)
    }

    /// Defaults overridden by any `PIPETTE_*` variables that are set.
    pub fn from_vars(vars: &impl VarSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(low) = read_vec3(vars, "PIPETTE_ENVELOPE_LOW")? {
            config.envelope.low = low;
        }
        if let Some(high) = read_vec3(vars, "PIPETTE_ENVELOPE_HIGH")? {
            config.envelope.high = high;
        }
        if let Some(max_steps) = read_var(vars, "PIPETTE_MAX_STEPS")? {
            config.max_steps = max_steps;
        }
        if let Some(threshold) = read_var(vars, "PIPETTE_DISTANCE_THRESHOLD")? {
            config.distance_threshold = threshold;
        }
        if let Some(bonus) = read_var(vars, "PIPETTE_GOAL_BONUS")? {
            config.goal_bonus = bonus;
        }
        if let Some(normalize) = read_var::<bool>(vars, "PIPETTE_NORMALIZE_OBS")? {
            config.observation_mode = if normalize {
                ObservationMode::Normalized
            } else {
                ObservationMode::Raw
            };
        }

        config.validate()?;
        debug!("Environment config: {:?}", config);
        Ok(config)
    }
}
