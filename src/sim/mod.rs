//! Simulator adapter boundary
//!
//! The physics engine is an external collaborator. The environment only needs
//! `reset`/`run`/`close` and the pipette position of the first agent; every
//! other telemetry field is carried along untouched.

mod kinematic;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::infra::Vec3;

pub use kinematic::{KinematicConfig, KinematicSimulation};

/// Velocity command for x, y, z plus the drop actuator.
pub type SimAction = [f32; 4];

/// Per-agent status keyed by agent id (`robotId_1`, ...). Ordered so the first agent is stable.
pub type AgentStatusMap = BTreeMap<String, AgentStatus>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointState {
    pub position: f32,
    pub velocity: f32,
    pub motor_torque: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentStatus {
    pub pipette_position: Vec3,
    pub robot_position: Vec3,
    pub joint_states: BTreeMap<String, JointState>,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("simulation reported no agents")]
    NoAgents,

    #[error("simulation has been closed")]
    Closed,

    #[error("expected one action per agent ({expected}), got {got}")]
    ActionCount { expected: usize, got: usize },

    #[error("simulation backend failed: {0}")]
    Backend(String),
}

pub trait Simulation {
    /// Start from a fresh physical state with `num_agents` robots.
    fn reset(&mut self, num_agents: usize) -> Result<AgentStatusMap, SimulationError>;

    /// Apply one action per agent for `num_steps` physics ticks.
    fn run(
        &mut self,
        actions: &[SimAction],
        num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError>;

    /// Release the backend. Must tolerate repeated calls.
    fn close(&mut self);
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn reset(&mut self, num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        (**self).reset(num_agents)
    }

    fn run(
        &mut self,
        actions: &[SimAction],
        num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        (**self).run(actions, num_steps)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

pub fn agent_id(index: usize) -> String {
    format!("robotId_{}", index + 1)
}

/// The environment drives a single robot, so only the first agent matters.
pub fn first_agent(status: &AgentStatusMap) -> Result<&AgentStatus, SimulationError> {
    status.values().next().ok_or(SimulationError::NoAgents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_agent_is_ordered() {
        let mut status = AgentStatusMap::new();
        status.insert(
            agent_id(1),
            AgentStatus {
                pipette_position: [2.0, 2.0, 2.0],
                ..Default::default()
            },
        );
        status.insert(
            agent_id(0),
            AgentStatus {
                pipette_position: [1.0, 1.0, 1.0],
                ..Default::default()
            },
        );

        let agent = first_agent(&status).unwrap();
        assert_eq!(agent.pipette_position, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_first_agent_empty() {
        let status = AgentStatusMap::new();
        assert!(matches!(first_agent(&status), Err(SimulationError::NoAgents)));
    }
}
