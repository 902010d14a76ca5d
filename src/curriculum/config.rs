use tracing::debug;

use crate::infra::config::read_var;
use crate::infra::{ConfigError, ProcessEnv, VarSource};

/// Curriculum configuration
///
/// The controller shrinks the success radius while the windowed success rate
/// is above `target_success_rate` and grows it while the rate is below the
/// lower band. Without a lower band the controller always moves unless the
/// rate equals the target exactly.
#[derive(Debug, Clone)]
pub struct CurriculumConfig {
    /// Success rate the curriculum steers towards
    pub target_success_rate: f32,
    /// Number of episodes in the sliding window
    pub window_size: usize,
    /// Multiplier (< 1) applied when the task is too easy
    pub decay_factor: f32,
    /// Multiplier (> 1) applied when the task is too hard
    pub growth_factor: f32,
    /// Rate below which the task is made easier; defaults to the target
    pub lower_band: Option<f32>,
    /// Floor for the success radius
    pub min_threshold: f32,
    /// Ceiling for the success radius
    pub max_threshold: f32,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            target_success_rate: 0.8,
            window_size: 100,
            decay_factor: 0.99,
            growth_factor: 1.01,
            lower_band: None,
            min_threshold: 1e-4,
            max_threshold: 0.1,
        }
    }
}

impl CurriculumConfig {
    /// Slow tightening with a neutral band between `lower_band` and the target
    pub fn banded(lower_band: f32) -> Self {
        Self {
            decay_factor: 0.999,
            lower_band: Some(lower_band),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target_success_rate: f32) -> Self {
        self.target_success_rate = target_success_rate;
        self
    }

    pub fn with_window(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_limits(mut self, min_threshold: f32, max_threshold: f32) -> Self {
        self.min_threshold = min_threshold;
        self.max_threshold = max_threshold;
        self
    }

    pub fn lower_band(&self) -> f32 {
        self.lower_band.unwrap_or(self.target_success_rate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.target_success_rate) {
            return Err(ConfigError::OutOfRange {
                name: "target_success_rate",
                range: "[0, 1]",
                value: self.target_success_rate,
            });
        }
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "decay_factor",
                range: "(0, 1)",
                value: self.decay_factor,
            });
        }
        if !(self.growth_factor.is_finite() && self.growth_factor > 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "growth_factor",
                range: "(1, inf)",
                value: self.growth_factor,
            });
        }
        if let Some(lower) = self.lower_band
            && !(0.0..=self.target_success_rate).contains(&lower)
        {
            return Err(ConfigError::OutOfRange {
                name: "lower_band",
                range: "[0, target_success_rate]",
                value: lower,
            });
        }
        for (name, value) in [
            ("min_threshold", self.min_threshold),
            ("max_threshold", self.max_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.min_threshold > self.max_threshold {
            return Err(ConfigError::InvertedThresholdLimits {
                min: self.min_threshold,
                max: self.max_threshold,
            });
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&ProcessEnv)
    }

    /// Defaults overridden by any `CURRICULUM_*` variables that are set.
    pub fn from_vars(vars: &impl VarSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(target) = read_var(vars, "CURRICULUM_TARGET_RATE")? {
            config.target_success_rate = target;
        }
        if let Some(window) = read_var(vars, "CURRICULUM_WINDOW")? {
            config.window_size = window;
        }
        if let Some(decay) = read_var(vars, "CURRICULUM_DECAY")? {
            config.decay_factor = decay;
        }
        if let Some(growth) = read_var(vars, "CURRICULUM_GROWTH")? {
            config.growth_factor = growth;
        }
        if let Some(lower) = read_var(vars, "CURRICULUM_LOWER_BAND")? {
            config.lower_band = Some(lower);
        }
        if let Some(min) = read_var(vars, "CURRICULUM_MIN_THRESHOLD")? {
            config.min_threshold = min;
        }
        if let Some(max) = read_var(vars, "CURRICULUM_MAX_THRESHOLD")? {
            config.max_threshold = max;
        }

        config.validate()?;
        debug!("Curriculum config: {:?}", config);
        Ok(config)
    }
}
