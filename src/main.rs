use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pipettebot::curriculum::{CurriculumConfig, CurriculumController};
use pipettebot::env::{EnvConfig, ReachEnv};
use pipettebot::runner::{
    CompositeObserver, DefaultObserver, EpisodeMetrics, EpisodeObserver, EpisodeRunner,
    RunStatistics, RunnerConfig, TrajectoryRecorder, policy_by_name,
};
use pipettebot::sim::{KinematicConfig, KinematicSimulation};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pipettebot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let env_config = EnvConfig::from_env()?;
    let curriculum_config = CurriculumConfig::from_env()?;
    let runner_config = RunnerConfig::from_env()?;

    let simulation = KinematicSimulation::new(KinematicConfig {
        workspace: env_config.envelope,
        ..Default::default()
    });
    let env = ReachEnv::new(env_config, simulation)?;

    let policy = policy_by_name(&runner_config.policy, *env.action_space(), runner_config.seed)
        .ok_or_else(|| format!("unknown policy '{}' (expected random, zero or seek)", runner_config.policy))?;

    let mut observers: Vec<Box<dyn EpisodeObserver>> =
        vec![Box::new(DefaultObserver), Box::new(EpisodeMetrics::default())];
    if let Some(folder) = &runner_config.trajectory_folder {
        tracing::info!("Recording trajectories to {}", folder);
        observers.push(Box::new(TrajectoryRecorder::new(folder)?));
    }

    let curriculum = CurriculumController::new(curriculum_config)?;
    let mut runner = EpisodeRunner::new(env, policy, Box::new(CompositeObserver::new(observers)))
        .with_curriculum(curriculum);

    let result = runner.run(runner_config.episodes, runner_config.seed);
    runner.close();

    let summaries = result?;
    RunStatistics::from_summaries(&summaries).print_summary();

    Ok(())
}
