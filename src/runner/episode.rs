use tracing::{debug, info};

use crate::curriculum::{Adjustment, CurriculumController};
use crate::env::{EnvError, Environment, ThresholdControl};
use crate::infra::config::read_var;
use crate::infra::{ConfigError, ProcessEnv, VarSource};

use super::observer::EpisodeObserver;
use super::policy::Policy;

/// Outcome of one finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f32,
    /// Goal reached before the step budget ran out
    pub success: bool,
    pub truncated: bool,
    pub final_distance: f32,
    /// Success radius in effect during the episode
    pub threshold: f32,
    /// `None` when no curriculum is attached
    pub adjustment: Option<Adjustment>,
}

/// Settings for the binary's episode loop
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub episodes: usize,
    pub seed: Option<u64>,
    pub policy: String,
    pub trajectory_folder: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            seed: None,
            policy: "seek".to_string(),
            trajectory_folder: None,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&ProcessEnv)
    }

    pub fn from_vars(vars: &impl VarSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(episodes) = read_var(vars, "PIPETTE_EPISODES")? {
            config.episodes = episodes;
        }
        config.seed = read_var(vars, "PIPETTE_SEED")?;
        if let Some(policy) = vars.var("PIPETTE_POLICY") {
            config.policy = policy.trim().to_string();
        }
        config.trajectory_folder = vars
            .var("PIPETTE_TRAJECTORY_FOLDER")
            .map(|folder| folder.trim().to_string())
            .filter(|folder| !folder.is_empty());

        debug!("Runner config: {:?}", config);
        Ok(config)
    }
}

/// Drives a policy through episodes and feeds outcomes to the curriculum
pub struct EpisodeRunner<E, P>
where
    E: Environment + ThresholdControl,
    P: Policy,
{
    env: E,
    policy: P,
    observer: Box<dyn EpisodeObserver>,
    curriculum: Option<CurriculumController>,
    episodes_run: usize,
}

impl<E, P> EpisodeRunner<E, P>
where
    E: Environment + ThresholdControl,
    P: Policy,
{
    pub fn new(env: E, policy: P, observer: Box<dyn EpisodeObserver>) -> Self {
        Self {
            env,
            policy,
            observer,
            curriculum: None,
            episodes_run: 0,
        }
    }

    pub fn with_curriculum(mut self, curriculum: CurriculumController) -> Self {
        self.curriculum = Some(curriculum);
        self
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn curriculum(&self) -> Option<&CurriculumController> {
        self.curriculum.as_ref()
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Run one episode until it terminates or truncates
    pub fn run_episode(&mut self, seed: Option<u64>) -> Result<EpisodeSummary, EnvError> {
        let episode = self.episodes_run;
        let threshold = self.env.distance_threshold();

        let (mut observation, _) = self.env.reset(seed)?;
        self.observer
            .on_episode_start(episode, &observation, threshold);

        let mut steps = 0;
        let mut total_reward = 0.0;
        let result = loop {
            let action = self.policy.act(&observation);
            let result = self.env.step(action)?;
            steps += 1;
            total_reward += result.reward;
            self.observer.on_step(episode, &action, &result);

            if result.done() {
                break result;
            }
            observation = result.observation;
        };

        let adjustment = self
            .curriculum
            .as_mut()
            .map(|curriculum| curriculum.observe(result.terminated, Some(&mut self.env)));

        let summary = EpisodeSummary {
            episode,
            steps,
            total_reward,
            success: result.terminated,
            truncated: result.truncated,
            final_distance: result.distance,
            threshold,
            adjustment,
        };
        self.episodes_run += 1;
        self.observer.on_episode_end(&summary);
        Ok(summary)
    }

    /// Run `episodes` episodes. With a seed, episode `i` resets with `seed + i`.
    pub fn run(
        &mut self,
        episodes: usize,
        seed: Option<u64>,
    ) -> Result<Vec<EpisodeSummary>, EnvError> {
        info!(
            "Running {} episodes with policy '{}'",
            episodes,
            self.policy.name()
        );
        let mut summaries = Vec::with_capacity(episodes);
        for i in 0..episodes {
            let episode_seed = seed.map(|seed| seed.wrapping_add(i as u64));
            summaries.push(self.run_episode(episode_seed)?);
        }
        Ok(summaries)
    }

    pub fn close(&mut self) {
        self.env.close();
    }
}
