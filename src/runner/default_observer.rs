use tracing::{debug, info};

use crate::env::{Action, Observation, StepInfo, StepResult};

use super::episode::EpisodeSummary;
use super::observer::EpisodeObserver;

/// Logs episode boundaries at info and progress at debug
pub struct DefaultObserver;

impl EpisodeObserver for DefaultObserver {
    fn on_episode_start(&mut self, episode: usize, observation: &Observation, threshold: f32) {
        info!("Episode {} started", episode + 1);
        debug!("- pipette: {:?}", observation.position());
        debug!("- goal: {:?}", observation.goal());
        debug!("- threshold: {:.5}", threshold);
    }

    fn on_step(&mut self, episode: usize, action: &Action, result: &StepResult) {
        if let StepInfo::Progress {
            pipette_position,
            distance,
            reward,
        } = &result.info
        {
            debug!(
                "episode {}: action {:?}, pos {:?}, distance {:.5}, reward {:.5}",
                episode + 1,
                action.0,
                pipette_position,
                distance,
                reward
            );
        }
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        let outcome = if summary.success {
            "goal reached"
        } else if summary.truncated {
            "max steps reached"
        } else {
            "stopped"
        };
        info!(
            "Episode {} finished after {} steps: {} (reward {:.3}, final distance {:.5})",
            summary.episode + 1,
            summary.steps,
            outcome,
            summary.total_reward,
            summary.final_distance
        );
        if let Some(adjustment) = &summary.adjustment
            && adjustment.changed()
        {
            info!("Curriculum: {}", adjustment);
        }
    }
}
