//! Reach environment - gym-like episodic interface around the pipette simulator
//!
//! ```text
//! Action (3) ──clamp──► [vx, vy, vz, drop=0] ──► Simulation::run
//!                                                   │
//!                                      pipette_position of first agent
//!                                                   │
//!                         Observation [px, py, pz, gx, gy, gz]
//!                                                   │
//!                      RewardShaper ──► terminate(distance, threshold)
//!                                                   │
//!                  StepResult {reward, terminated, truncated, info}
//! ```
//!
//! The success radius lives on the environment and is the only state that
//! survives `reset`; the curriculum adjusts it through [`ThresholdControl`].

mod config;
mod observation;
mod reach;
pub mod reward;

use thiserror::Error;

use crate::infra::ConfigError;
use crate::sim::SimulationError;

pub use config::{EnvConfig, ObservationMode};
pub use observation::{ACTION_DIM, Action, BoxSpace, DROP_COMMAND, OBS_DIM, Observation};
pub use reach::{MAX_STEPS_REACHED, ReachEnv, ResetInfo, StepInfo, StepResult};
pub use reward::{RewardShaper, Termination, TerminationReason};

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid environment configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("action must have {expected} components, got {got}")]
    InvalidAction { expected: usize, got: usize },

    #[error("distance threshold must be positive and finite, got {0}")]
    InvalidThreshold(f32),

    #[error("step called without an active episode; call reset first")]
    NotReset,

    #[error("environment has been closed")]
    Closed,
}

/// Episodic control interface consumed by a driving loop
pub trait Environment {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, ResetInfo), EnvError>;

    fn step(&mut self, action: Action) -> Result<StepResult, EnvError>;

    /// Release the simulator. Safe to call more than once.
    fn close(&mut self);
}

/// Difficulty knob exposed to the curriculum
pub trait ThresholdControl {
    fn distance_threshold(&self) -> f32;

    /// Rejects non-positive or non-finite values. Takes effect on the next `step`.
    fn set_distance_threshold(&mut self, threshold: f32) -> Result<(), EnvError>;
}
