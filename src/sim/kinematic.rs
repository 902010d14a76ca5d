//! Kinematic stand-in for the OT-2 gantry
//!
//! Integrates velocity commands into a point that is clamped to the gantry's
//! reachable box. Joint telemetry is synthesized: torque spikes when an axis
//! drives into its end stop, which is what the boundary-probing scripts for the
//! real robot look for. There is no dynamics here.

use tracing::debug;

use crate::infra::{Envelope, Vec3};

use super::{AgentStatus, AgentStatusMap, JointState, SimAction, Simulation, SimulationError, agent_id};

const JOINT_NAMES: [&str; 3] = ["joint_0", "joint_1", "joint_2"];

#[derive(Debug, Clone)]
pub struct KinematicConfig {
    /// Reachable box for the pipette tip
    pub workspace: Envelope,
    /// Pipette tip position after reset; `None` starts at the workspace center
    pub start: Option<Vec3>,
    /// Offset from the gantry position to the pipette tip
    pub pipette_offset: Vec3,
    /// Speed in m/s for a command of magnitude 1
    pub max_speed: f32,
    /// Seconds per physics tick
    pub dt: f32,
    /// Torque reported for a full-speed command into an end stop
    pub stall_torque: f32,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self {
            workspace: Envelope::default(),
            start: None,
            pipette_offset: [0.073, 0.0895, 0.0895],
            max_speed: 0.5,
            dt: 1.0 / 240.0,
            stall_torque: 600.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Agent {
    tip: Vec3,
    velocity: Vec3,
    torque: Vec3,
}

pub struct KinematicSimulation {
    config: KinematicConfig,
    agents: Vec<Agent>,
    closed: bool,
}

impl KinematicSimulation {
    pub fn new(config: KinematicConfig) -> Self {
        Self {
            config,
            agents: Vec::new(),
            closed: false,
        }
    }

    pub fn config(&self) -> &KinematicConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn start_position(&self) -> Vec3 {
        let start = self.config.start.unwrap_or_else(|| self.config.workspace.center());
        self.config.workspace.clamp(&start)
    }

    fn advance(&mut self, actions: &[SimAction]) {
        let workspace = self.config.workspace;
        let (speed, dt, stall) = (self.config.max_speed, self.config.dt, self.config.stall_torque);

        for (agent, action) in self.agents.iter_mut().zip(actions) {
            let wanted: Vec3 = std::array::from_fn(|axis| agent.tip[axis] + action[axis] * speed * dt);
            let reached = workspace.clamp(&wanted);

            for axis in 0..3 {
                agent.velocity[axis] = (reached[axis] - agent.tip[axis]) / dt;
                // Blocked motion turns into torque against the end stop
                let blocked = (wanted[axis] - reached[axis]).abs() > 0.0;
                agent.torque[axis] = if blocked {
                    action[axis].signum() * stall * action[axis].abs().max(0.1)
                } else {
                    action[axis] * stall * 0.05
                };
            }
            agent.tip = reached;
        }
    }

    fn status(&self) -> AgentStatusMap {
        self.agents
            .iter()
            .enumerate()
            .map(|(index, agent)| {
                let robot_position: Vec3 =
                    std::array::from_fn(|axis| agent.tip[axis] - self.config.pipette_offset[axis]);
                let joint_states = JOINT_NAMES
                    .iter()
                    .enumerate()
                    .map(|(axis, name)| {
                        (
                            name.to_string(),
                            JointState {
                                position: agent.tip[axis] - self.config.workspace.low[axis],
                                velocity: agent.velocity[axis],
                                motor_torque: agent.torque[axis],
                            },
                        )
                    })
                    .collect();

                (
                    agent_id(index),
                    AgentStatus {
                        pipette_position: agent.tip,
                        robot_position,
                        joint_states,
                    },
                )
            })
            .collect()
    }
}

impl Default for KinematicSimulation {
    fn default() -> Self {
        Self::new(KinematicConfig::default())
    }
}

impl Simulation for KinematicSimulation {
    fn reset(&mut self, num_agents: usize) -> Result<AgentStatusMap, SimulationError> {
        if self.closed {
            return Err(SimulationError::Closed);
        }
        if num_agents == 0 {
            return Err(SimulationError::NoAgents);
        }

        let tip = self.start_position();
        self.agents = vec![
            Agent {
                tip,
                velocity: [0.0; 3],
                torque: [0.0; 3],
            };
            num_agents
        ];
        debug!("Kinematic simulation reset with {} agent(s) at {:?}", num_agents, tip);

        Ok(self.status())
    }

    fn run(
        &mut self,
        actions: &[SimAction],
        num_steps: usize,
    ) -> Result<AgentStatusMap, SimulationError> {
        if self.closed {
            return Err(SimulationError::Closed);
        }
        if actions.len() != self.agents.len() {
            return Err(SimulationError::ActionCount {
                expected: self.agents.len(),
                got: actions.len(),
            });
        }

        for _ in 0..num_steps {
            self.advance(actions);
        }

        Ok(self.status())
    }

    fn close(&mut self) {
        if !self.closed {
            debug!("Kinematic simulation closed");
        }
        self.closed = true;
        self.agents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> KinematicSimulation {
        KinematicSimulation::new(KinematicConfig {
            workspace: Envelope::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            start: Some([0.5, 0.5, 0.5]),
            pipette_offset: [0.0; 3],
            max_speed: 1.0,
            dt: 0.1,
            stall_torque: 100.0,
        })
    }

    #[test]
    fn test_reset_reports_start() {
        let mut sim = sim();
        let status = sim.reset(2).unwrap();

        assert_eq!(status.len(), 2);
        let agent = &status["robotId_1"];
        assert_eq!(agent.pipette_position, [0.5, 0.5, 0.5]);
        assert_eq!(agent.joint_states.len(), 3);
    }

    #[test]
    fn test_run_integrates_velocity() {
        let mut sim = sim();
        sim.reset(1).unwrap();

        let status = sim.run(&[[1.0, 0.0, -1.0, 0.0]], 2).unwrap();
        let tip = status["robotId_1"].pipette_position;

        assert!((tip[0] - 0.7).abs() < 1e-5);
        assert!((tip[1] - 0.5).abs() < 1e-5);
        assert!((tip[2] - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_end_stop_clamps_and_stalls() {
        let mut sim = sim();
        sim.reset(1).unwrap();

        let status = sim.run(&[[1.0, 0.0, 0.0, 0.0]], 20).unwrap();
        let agent = &status["robotId_1"];

        assert_eq!(agent.pipette_position[0], 1.0);
        assert!(agent.joint_states["joint_0"].motor_torque >= 100.0);
        assert_eq!(agent.joint_states["joint_0"].velocity, 0.0);
    }

    #[test]
    fn test_action_count_mismatch() {
        let mut sim = sim();
        sim.reset(1).unwrap();

        let result = sim.run(&[[0.0; 4], [0.0; 4]], 1);
        assert!(matches!(
            result,
            Err(SimulationError::ActionCount {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut sim = sim();
        sim.reset(1).unwrap();
        sim.close();
        sim.close();

        assert!(sim.is_closed());
        assert!(matches!(sim.run(&[[0.0; 4]], 1), Err(SimulationError::Closed)));
        assert!(matches!(sim.reset(1), Err(SimulationError::Closed)));
    }
}
