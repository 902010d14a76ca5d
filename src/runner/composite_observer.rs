use crate::env::{Action, Observation, StepResult};

use super::episode::EpisodeSummary;
use super::observer::EpisodeObserver;

pub struct CompositeObserver {
    observers: Vec<Box<dyn EpisodeObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn EpisodeObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: impl EpisodeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl EpisodeObserver for CompositeObserver {
    fn on_episode_start(&mut self, episode: usize, observation: &Observation, threshold: f32) {
        for observer in &mut self.observers {
            observer.on_episode_start(episode, observation, threshold);
        }
    }

    fn on_step(&mut self, episode: usize, action: &Action, result: &StepResult) {
        for observer in &mut self.observers {
            observer.on_step(episode, action, result);
        }
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        for observer in &mut self.observers {
            observer.on_episode_end(summary);
        }
    }
}
