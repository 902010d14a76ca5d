//! Reward shaping and termination policy
//!
//! The potential is the negative distance to the goal, so the shaped reward is
//! the distance gained since the previous step. Reaching the goal adds a fixed
//! bonus on top.

use std::fmt;

use crate::infra::euclidean_distance;

use super::observation::Observation;

pub const GOAL_REACHED_BONUS: f32 = 100.0;

/// Distance between the pipette (first three components) and the goal (last three)
pub fn distance(observation: &Observation) -> f32 {
    euclidean_distance(&observation.position(), &observation.goal())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    GoalReached,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::GoalReached => "goal_reached",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Termination {
    pub terminated: bool,
    pub reason: Option<TerminationReason>,
    pub bonus: f32,
}

/// Strict comparison: a distance equal to the threshold does not terminate.
pub fn terminate(distance: f32, threshold: f32, bonus: f32) -> Termination {
    if distance < threshold {
        Termination {
            terminated: true,
            reason: Some(TerminationReason::GoalReached),
            bonus,
        }
    } else {
        Termination {
            terminated: false,
            reason: None,
            bonus: 0.0,
        }
    }
}

/// Tracks the previous distance between calls within one episode
#[derive(Debug, Clone, Default)]
pub struct RewardShaper {
    previous_distance: Option<f32>,
}

impl RewardShaper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.previous_distance = None;
    }

    #[cfg(test)]
    pub fn previous_distance(&self) -> Option<f32> {
        self.previous_distance
    }

    /// Returns `(reward, distance)` for a new observation
    pub fn reward(&mut self, observation: &Observation) -> (f32, f32) {
        self.shape(distance(observation))
    }

    /// Returns `(reward, distance)` for an already computed distance
    pub fn shape(&mut self, current: f32) -> (f32, f32) {
        // First step of an episode has nothing to improve on
        let previous = self.previous_distance.unwrap_or(current);
        self.previous_distance = Some(current);
        (previous - current, current)
    }
}
