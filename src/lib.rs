pub mod curriculum;
pub mod env;
pub mod infra;
pub mod runner;
pub mod sim;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use curriculum::{CurriculumConfig, CurriculumController};
pub use env::{Action, EnvConfig, EnvError, Environment, Observation, ReachEnv, StepResult, ThresholdControl};
pub use sim::{KinematicSimulation, Simulation};
