use crate::env::{Action, Observation, StepResult};

use super::episode::EpisodeSummary;

/// Trait for observing episodes as the runner drives them
pub trait EpisodeObserver {
    /// Called right after `reset`
    fn on_episode_start(&mut self, episode: usize, observation: &Observation, threshold: f32);

    /// Called after every successful `step`
    fn on_step(&mut self, _episode: usize, _action: &Action, _result: &StepResult) {
        // Default implementation does nothing
    }

    /// Called once the episode is over and the curriculum has seen its outcome
    fn on_episode_end(&mut self, summary: &EpisodeSummary);
}
