//! Success-rate driven curriculum for the reach task
//!
//! Episode outcomes go into a sliding window. Once the window is full the
//! controller compares the success rate with a target after every episode and
//! nudges the environment's success radius: smaller when the agent succeeds
//! too often, larger when it fails too often.

mod config;
mod controller;
mod window;

pub use config::CurriculumConfig;
pub use controller::{Adjustment, CurriculumController, CurriculumPhase};
pub use window::SuccessWindow;
