//! Rolling episode metrics and end-of-run statistics

use std::time::Instant;

use crate::env::Observation;

use super::episode::EpisodeSummary;
use super::observer::EpisodeObserver;

/// Mean over the last `window` samples, kept in a fixed ring buffer
#[derive(Debug, Clone)]
pub struct RollingMean {
    samples: Vec<f32>,
    next: usize,
    filled: usize,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        Self {
            samples: vec![0.0; window.max(1)],
            next: 0,
            filled: 0,
        }
    }

    pub fn push(&mut self, value: f32) {
        self.samples[self.next] = value;
        self.next = (self.next + 1) % self.samples.len();
        self.filled = (self.filled + 1).min(self.samples.len());
    }

    /// 0 until the first sample arrives
    pub fn mean(&self) -> f32 {
        match self.filled {
            0 => 0.0,
            n => self.samples[..n].iter().sum::<f32>() / n as f32,
        }
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

/// Rolling per-episode metrics, logged every `log_every` episodes
#[derive(Debug)]
pub struct EpisodeMetrics {
    pub episode_rewards: RollingMean,
    pub episode_lengths: RollingMean,
    pub success_rate: RollingMean,
    pub final_distance: RollingMean,
    /// Success radius at the end of the latest episode
    pub threshold: f32,
    pub episodes: usize,
    pub total_steps: usize,
    log_every: usize,
    start_time: Instant,
}

impl EpisodeMetrics {
    pub fn new(window_size: usize, log_every: usize) -> Self {
        Self {
            episode_rewards: RollingMean::new(window_size),
            episode_lengths: RollingMean::new(window_size),
            success_rate: RollingMean::new(window_size),
            final_distance: RollingMean::new(window_size),
            threshold: 0.0,
            episodes: 0,
            total_steps: 0,
            log_every,
            start_time: Instant::now(),
        }
    }

    pub fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.episode_rewards.push(summary.total_reward);
        self.episode_lengths.push(summary.steps as f32);
        self.success_rate.push(if summary.success { 1.0 } else { 0.0 });
        self.final_distance.push(summary.final_distance);
        self.threshold = summary
            .adjustment
            .and_then(|adjustment| adjustment.threshold())
            .unwrap_or(summary.threshold);
        self.episodes += 1;
        self.total_steps += summary.steps;
    }

    pub fn steps_per_second(&self) -> f64 {
        let duration = self.start_time.elapsed().as_secs_f64();
        if duration > 0.0 {
            self.total_steps as f64 / duration
        } else {
            0.0
        }
    }

    pub fn log_to_console(&self) {
        tracing::info!(
            "Episodes {} | Steps {} | SPS {:.1}",
            self.episodes,
            self.total_steps,
            self.steps_per_second()
        );
        tracing::info!(
            "  reward={:.3}, length={:.1}, success={:.1}%, distance={:.5}, threshold={:.5}",
            self.episode_rewards.mean(),
            self.episode_lengths.mean(),
            self.success_rate.mean() * 100.0,
            self.final_distance.mean(),
            self.threshold
        );
    }
}

impl Default for EpisodeMetrics {
    fn default() -> Self {
        Self::new(100, 10)
    }
}

impl EpisodeObserver for EpisodeMetrics {
    fn on_episode_start(&mut self, _episode: usize, _observation: &Observation, threshold: f32) {
        self.threshold = threshold;
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.record_episode(summary);
        if self.log_every > 0 && self.episodes % self.log_every == 0 {
            self.log_to_console();
        }
    }
}

/// Totals over a finished run
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub num_episodes: usize,
    pub num_successes: usize,
    pub num_truncated: usize,
    pub total_reward: f32,
    pub total_steps: usize,
    pub final_threshold: Option<f32>,
}

impl RunStatistics {
    pub fn from_summaries(summaries: &[EpisodeSummary]) -> Self {
        let mut stats = Self::default();
        for summary in summaries {
            stats.num_episodes += 1;
            stats.total_reward += summary.total_reward;
            stats.total_steps += summary.steps;
            if summary.success {
                stats.num_successes += 1;
            }
            if summary.truncated {
                stats.num_truncated += 1;
            }
            stats.final_threshold = summary
                .adjustment
                .and_then(|adjustment| adjustment.threshold())
                .or(Some(summary.threshold));
        }
        stats
    }

    pub fn success_rate(&self) -> f32 {
        if self.num_episodes > 0 {
            self.num_successes as f32 / self.num_episodes as f32
        } else {
            0.0
        }
    }

    pub fn avg_reward(&self) -> f32 {
        if self.num_episodes > 0 {
            self.total_reward / self.num_episodes as f32
        } else {
            0.0
        }
    }

    pub fn avg_steps(&self) -> f32 {
        if self.num_episodes > 0 {
            self.total_steps as f32 / self.num_episodes as f32
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Episodes: {}", self.num_episodes);
        tracing::info!("Success Rate: {:.1}%", self.success_rate() * 100.0);
        tracing::info!("Truncated: {}", self.num_truncated);
        tracing::info!("Avg Reward: {:.3}", self.avg_reward());
        tracing::info!("Avg Steps: {:.1}", self.avg_steps());
        if let Some(threshold) = self.final_threshold {
            tracing::info!("Final Threshold: {:.5}", threshold);
        }
    }
}
