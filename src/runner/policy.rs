use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::env::{ACTION_DIM, Action, BoxSpace, Observation};

/// Maps observations to actions
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> Action;

    fn name(&self) -> &str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn act(&mut self, observation: &Observation) -> Action {
        (**self).act(observation)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Uniform samples from the action space
pub struct RandomPolicy {
    space: BoxSpace<ACTION_DIM>,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(space: BoxSpace<ACTION_DIM>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { space, rng }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action(self.space.sample(&mut self.rng))
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Always commands zero velocity
pub struct ZeroPolicy;

impl Policy for ZeroPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::zero()
    }

    fn name(&self) -> &str {
        "zero"
    }
}

/// Proportional controller towards the goal. A scripted baseline, not a learner.
pub struct GoalSeekingPolicy {
    gain: f32,
}

impl GoalSeekingPolicy {
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }
}

impl Default for GoalSeekingPolicy {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl Policy for GoalSeekingPolicy {
    fn act(&mut self, observation: &Observation) -> Action {
        let position = observation.position();
        let goal = observation.goal();
        // The environment clamps to the action box
        Action(std::array::from_fn(|axis| self.gain * (goal[axis] - position[axis])))
    }

    fn name(&self) -> &str {
        "seek"
    }
}

/// Policy selected by name, as used by the binary
pub fn policy_by_name(
    name: &str,
    space: BoxSpace<ACTION_DIM>,
    seed: Option<u64>,
) -> Option<Box<dyn Policy>> {
    match name {
        "random" => Some(Box::new(RandomPolicy::new(space, seed))),
        "zero" => Some(Box::new(ZeroPolicy)),
        "seek" => Some(Box::new(GoalSeekingPolicy::default())),
        _ => None,
    }
}
