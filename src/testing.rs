//! Simulation doubles shared by the unit tests

use std::collections::VecDeque;

use crate::env::{EnvError, ThresholdControl};
use crate::infra::Vec3;
use crate::sim::{AgentStatus, AgentStatusMap, JointState, SimAction, Simulation, SimulationError, agent_id};

fn status_at(position: Vec3) -> AgentStatusMap {
    let mut joint_states = std::collections::BTreeMap::new();
    joint_states.insert("joint_0".to_string(), JointState::default());

    let mut status = AgentStatusMap::new();
    status.insert(
        agent_id(0),
        AgentStatus {
            pipette_position: position,
            robot_position: position,
            joint_states,
        },
    );
    status
}

/// Never moves; records every command it receives
#[derive(Debug, Default)]
pub struct StationarySimulation {
    pub position: Vec3,
    pub resets: usize,
    pub commands: Vec<SimAction>,
    pub closes: usize,
}

impl StationarySimulation {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl Simulation for StationarySimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        self.resets += 1;
        Ok(status_at(self.position))
    }

    fn run(
        &mut self,
        actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        self.commands.extend_from_slice(actions);
        Ok(status_at(self.position))
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

/// Replays a fixed list of pipette positions, one per `run`, then holds the last one
#[derive(Debug)]
pub struct ScriptedSimulation {
    start: Vec3,
    script: VecDeque<Vec3>,
    current: Vec3,
}

impl ScriptedSimulation {
    pub fn new(start: Vec3, script: Vec<Vec3>) -> Self {
        Self {
            start,
            script: script.into(),
            current: start,
        }
    }
}

impl Simulation for ScriptedSimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        self.current = self.start;
        Ok(status_at(self.current))
    }

    fn run(
        &mut self,
        _actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        Ok(status_at(self.current))
    }

    fn close(&mut self) {}
}

/// Resets fine, fails on every `run`
#[derive(Debug, Default)]
pub struct FailingSimulation;

impl Simulation for FailingSimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        Ok(status_at([0.0; 3]))
    }

    fn run(
        &mut self,
        _actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        Err(SimulationError::Backend("physics engine disconnected".to_string()))
    }

    fn close(&mut self) {}
}

/// Succeeds for the first `healthy_resets` resets, then fails every reset
#[derive(Debug)]
pub struct FlakyResetSimulation {
    position: Vec3,
    healthy_resets: usize,
    resets: usize,
}

impl FlakyResetSimulation {
    pub fn new(position: Vec3, healthy_resets: usize) -> Self {
        Self {
            position,
            healthy_resets,
            resets: 0,
        }
    }
}

impl Simulation for FlakyResetSimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        self.resets += 1;
        if self.resets > self.healthy_resets {
            return Err(SimulationError::Backend("reset timed out".to_string()));
        }
        Ok(status_at(self.position))
    }

    fn run(
        &mut self,
        _actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        Ok(status_at(self.position))
    }

    fn close(&mut self) {}
}

/// Reports its agent on reset, then loses it on every `run`
#[derive(Debug, Default)]
pub struct VanishingSimulation;

impl Simulation for VanishingSimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        Ok(status_at([0.0; 3]))
    }

    fn run(
        &mut self,
        _actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        Ok(AgentStatusMap::new())
    }

    fn close(&mut self) {}
}

/// Reports an empty agent map
#[derive(Debug, Default)]
pub struct EmptySimulation;

impl Simulation for EmptySimulation {
    fn reset(&mut self, _num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        Ok(AgentStatusMap::new())
    }

    fn run(
        &mut self,
        _actions: &[SimAction],
        _num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        Ok(AgentStatusMap::new())
    }

    fn close(&mut self) {}
}

/// Bare threshold holder for curriculum tests
#[derive(Debug)]
pub struct FixedThreshold {
    pub threshold: f32,
    pub locked: bool,
}

impl FixedThreshold {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            locked: false,
        }
    }
}

impl ThresholdControl for FixedThreshold {
    fn distance_threshold(&self) -> f32 {
        self.threshold
    }

    fn set_distance_threshold(&mut self, threshold: f32) -> Result<(), EnvError> {
        if self.locked {
            return Err(EnvError::Closed);
        }
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(EnvError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(())
    }
}
