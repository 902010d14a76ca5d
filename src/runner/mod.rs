//! Episode loop around an [`Environment`](crate::env::Environment)
//!
//! The runner is the external driving loop: it asks a [`Policy`] for actions,
//! steps the environment until the episode is done, hands the outcome to the
//! curriculum and reports to an [`EpisodeObserver`].

mod composite_observer;
mod default_observer;
mod episode;
mod metrics;
mod observer;
mod policy;
mod trajectory;

pub use composite_observer::CompositeObserver;
pub use default_observer::DefaultObserver;
pub use episode::{EpisodeRunner, EpisodeSummary, RunnerConfig};
pub use metrics::{EpisodeMetrics, RollingMean, RunStatistics};
pub use observer::EpisodeObserver;
pub use policy::{GoalSeekingPolicy, Policy, RandomPolicy, ZeroPolicy, policy_by_name};
pub use trajectory::TrajectoryRecorder;
