//! Observation, action and box-space types

use rand::Rng;

use crate::infra::Vec3;
use crate::sim::SimAction;

use super::EnvError;

pub const OBS_DIM: usize = 6;
pub const ACTION_DIM: usize = 3;

/// Fourth simulator command component. The drop actuator is never used while reaching.
pub const DROP_COMMAND: f32 = 0.0;

/// Pipette position followed by the goal position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; OBS_DIM]);

impl Observation {
    pub fn new(position: Vec3, goal: Vec3) -> Self {
        Self([
            position[0],
            position[1],
            position[2],
            goal[0],
            goal[1],
            goal[2],
        ])
    }

    pub fn position(&self) -> Vec3 {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn goal(&self) -> Vec3 {
        [self.0[3], self.0[4], self.0[5]]
    }

    pub fn as_array(&self) -> &[f32; OBS_DIM] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<[f32; OBS_DIM]> for Observation {
    fn from(values: [f32; OBS_DIM]) -> Self {
        Self(values)
    }
}

/// Per-axis velocity command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action(pub [f32; ACTION_DIM]);

impl Action {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self([x, y, z])
    }

    pub fn zero() -> Self {
        Self([0.0; ACTION_DIM])
    }

    /// Clamp into `space`; NaN and infinite components become 0.
    pub fn clamped(&self, space: &BoxSpace<ACTION_DIM>) -> Self {
        let finite = self.0.map(|value| if value.is_finite() { value } else { 0.0 });
        Self(space.clamp(&finite))
    }

    pub fn to_sim_command(&self) -> SimAction {
        [self.0[0], self.0[1], self.0[2], DROP_COMMAND]
    }
}

impl From<[f32; ACTION_DIM]> for Action {
    fn from(values: [f32; ACTION_DIM]) -> Self {
        Self(values)
    }
}

impl TryFrom<&[f32]> for Action {
    type Error = EnvError;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        let values: [f32; ACTION_DIM] = values.try_into().map_err(|_| EnvError::InvalidAction {
            expected: ACTION_DIM,
            got: values.len(),
        })?;
        Ok(Self(values))
    }
}

/// Box-shaped space with per-dimension bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpace<const N: usize> {
    pub low: [f32; N],
    pub high: [f32; N],
}

impl<const N: usize> BoxSpace<N> {
    pub fn new(low: [f32; N], high: [f32; N]) -> Self {
        Self { low, high }
    }

    pub fn uniform(low: f32, high: f32) -> Self {
        Self {
            low: [low; N],
            high: [high; N],
        }
    }

    pub const fn dim(&self) -> usize {
        N
    }

    pub fn contains(&self, values: &[f32; N]) -> bool {
        (0..N).all(|i| values[i] >= self.low[i] && values[i] <= self.high[i])
    }

    pub fn clamp(&self, values: &[f32; N]) -> [f32; N] {
        std::array::from_fn(|i| values[i].clamp(self.low[i], self.high[i]))
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; N] {
        std::array::from_fn(|i| rng.random_range(self.low[i]..=self.high[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_layout() {
        let obs = Observation::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);

        assert_eq!(obs.as_slice().len(), OBS_DIM);
        assert_eq!(obs.position(), [1.0, 2.0, 3.0]);
        assert_eq!(obs.goal(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_action_clamp() {
        let space = BoxSpace::uniform(-1.0, 1.0);
        let action = Action::new(2.5, -0.3, f32::NAN).clamped(&space);

        assert_eq!(action, Action::new(1.0, -0.3, 0.0));
        assert_eq!(action.to_sim_command(), [1.0, -0.3, 0.0, DROP_COMMAND]);
    }

    #[test]
    fn test_action_from_slice() {
        let ok = Action::try_from([0.1, 0.2, 0.3].as_slice()).unwrap();
        assert_eq!(ok, Action::new(0.1, 0.2, 0.3));

        let err = Action::try_from([0.1, 0.2, 0.3, 0.0].as_slice()).unwrap_err();
        assert!(matches!(
            err,
            EnvError::InvalidAction {
                expected: 3,
                got: 4
            }
        ));
    }

    #[test]
    fn test_box_space() {
        let space: BoxSpace<2> = BoxSpace::new([-1.0, 0.0], [1.0, 0.5]);

        assert_eq!(space.dim(), 2);
        assert!(space.contains(&[0.0, 0.5]));
        assert!(!space.contains(&[0.0, 0.6]));
        assert_eq!(space.clamp(&[-3.0, 3.0]), [-1.0, 0.5]);
    }
}
