use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use crate::infra::Vec3;
use crate::sim::{Simulation, first_agent};

use super::config::{EnvConfig, ObservationMode};
use super::observation::{ACTION_DIM, Action, BoxSpace, OBS_DIM, Observation};
use super::reward::{self, RewardShaper, TerminationReason};
use super::{EnvError, Environment, ThresholdControl};

pub const MAX_STEPS_REACHED: &str = "Max steps reached";

/// Metadata returned by `reset`. Always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetInfo;

impl ResetInfo {
    pub fn is_empty(&self) -> bool {
        true
    }
}

/// Additional information from a step. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInfo {
    Terminated {
        reason: TerminationReason,
    },
    Truncated {
        reason: &'static str,
    },
    /// Reported only while the episode continues
    Progress {
        pipette_position: Vec3,
        distance: f32,
        reward: f32,
    },
}

impl StepInfo {
    /// Key names of the info mapping as consumed by gym-style tooling
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            StepInfo::Terminated { .. } => &["Terminated"],
            StepInfo::Truncated { .. } => &["Truncated"],
            StepInfo::Progress { .. } => &["Pipette coordinates", "Distance from goal", "Reward"],
        }
    }

    /// Key/value rendering of the info mapping
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        match self {
            StepInfo::Terminated { reason } => vec![("Terminated", reason.to_string())],
            StepInfo::Truncated { reason } => vec![("Truncated", reason.to_string())],
            StepInfo::Progress {
                pipette_position,
                distance,
                reward,
            } => vec![
                ("Pipette coordinates", format!("{:?}", pipette_position)),
                ("Distance from goal", distance.to_string()),
                ("Reward", reward.to_string()),
            ],
        }
    }
}

/// Step result from the environment
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Observation,
    /// Shaped reward including any terminal bonus
    pub reward: f32,
    /// Goal reached
    pub terminated: bool,
    /// Step budget exhausted without reaching the goal
    pub truncated: bool,
    /// Distance to the goal in simulator units
    pub distance: f32,
    pub info: StepInfo,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Single-agent reach task: drive the pipette tip to a sampled goal
pub struct ReachEnv<S: Simulation> {
    simulation: S,
    config: EnvConfig,
    action_space: BoxSpace<ACTION_DIM>,
    observation_space: BoxSpace<OBS_DIM>,
    rng: StdRng,
    /// `None` until the first reset and after a failed step
    goal: Option<Vec3>,
    steps: usize,
    shaper: RewardShaper,
    distance_threshold: f32,
    closed: bool,
}

impl<S: Simulation> ReachEnv<S> {
    pub fn new(config: EnvConfig, simulation: S) -> Result<Self, EnvError> {
        config.validate()?;
        debug!(
            "Reach environment: envelope {:?}..{:?}, max_steps {}, threshold {}",
            config.envelope.low, config.envelope.high, config.max_steps, config.distance_threshold
        );

        Ok(Self {
            simulation,
            distance_threshold: config.distance_threshold,
            config,
            action_space: BoxSpace::uniform(-1.0, 1.0),
            observation_space: BoxSpace::uniform(-1.0, 1.0),
            rng: StdRng::from_os_rng(),
            goal: None,
            steps: 0,
            shaper: RewardShaper::new(),
            closed: false,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn action_space(&self) -> &BoxSpace<ACTION_DIM> {
        &self.action_space
    }

    /// Declared bounds; only enforced in `ObservationMode::Normalized`
    pub fn observation_space(&self) -> &BoxSpace<OBS_DIM> {
        &self.observation_space
    }

    pub fn goal(&self) -> Option<Vec3> {
        self.goal
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    fn ensure_open(&self) -> Result<(), EnvError> {
        if self.closed {
            Err(EnvError::Closed)
        } else {
            Ok(())
        }
    }

    /// Reward is always computed on the raw observation; this only shapes what the agent sees
    fn present(&self, raw: Observation) -> Observation {
        match self.config.observation_mode {
            ObservationMode::Raw => raw,
            ObservationMode::Normalized => {
                let envelope = &self.config.envelope;
                Observation::new(
                    envelope.normalize(&raw.position()),
                    envelope.normalize(&raw.goal()),
                )
            }
        }
    }
}

impl<S: Simulation> Environment for ReachEnv<S> {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, ResetInfo), EnvError> {
        self.ensure_open()?;

        // A failed reset leaves no episode to continue
        self.goal = None;
        self.steps = 0;
        self.shaper.reset();

        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let goal = self.config.envelope.sample(&mut self.rng);

        let status = self.simulation.reset(1)?;
        let position = first_agent(&status)?.pipette_position;

        self.goal = Some(goal);

        debug!("Episode reset: pipette {:?}, goal {:?}", position, goal);
        Ok((self.present(Observation::new(position, goal)), ResetInfo))
    }

    fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        self.ensure_open()?;
        let goal = self.goal.ok_or(EnvError::NotReset)?;

        let command = action.clamped(&self.action_space).to_sim_command();
        let position = match self
            .simulation
            .run(&[command], 1)
            .and_then(|status| first_agent(&status).map(|agent| agent.pipette_position))
        {
            Ok(position) => position,
            Err(err) => {
                // The episode cannot continue from an unknown state
                warn!("Simulation step failed at step {}: {}", self.steps, err);
                self.goal = None;
                return Err(err.into());
            }
        };

        let raw = Observation::new(position, goal);
        let (mut reward, distance) = self.shaper.reward(&raw);
        let termination = reward::terminate(distance, self.distance_threshold, self.config.goal_bonus);
        reward += termination.bonus;

        self.steps += 1;

        // Reaching the goal on the last allowed step counts as success, not truncation
        let terminated = termination.terminated;
        let truncated = !terminated && self.steps >= self.config.max_steps;

        let info = match termination.reason {
            Some(reason) => StepInfo::Terminated { reason },
            None if truncated => StepInfo::Truncated {
                reason: MAX_STEPS_REACHED,
            },
            None => StepInfo::Progress {
                pipette_position: position,
                distance,
                reward,
            },
        };

        if terminated {
            debug!(
                "Goal reached after {} steps (distance {:.5} < {:.5})",
                self.steps, distance, self.distance_threshold
            );
        } else {
            trace!(
                "step {}: pos {:?}, distance {:.5}, reward {:.5}",
                self.steps, position, distance, reward
            );
        }

        Ok(StepResult {
            observation: self.present(raw),
            reward,
            terminated,
            truncated,
            distance,
            info,
        })
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.simulation.close();
        self.closed = true;
        self.goal = None;
        debug!("Reach environment closed");
    }
}

impl<S: Simulation> ThresholdControl for ReachEnv<S> {
    fn distance_threshold(&self) -> f32 {
        self.distance_threshold
    }

    fn set_distance_threshold(&mut self, threshold: f32) -> Result<(), EnvError> {
        self.ensure_open()?;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(EnvError::InvalidThreshold(threshold));
        }
        self.distance_threshold = threshold;
        Ok(())
    }
}
