use std::fmt;

use tracing::{debug, info, warn};

use crate::env::ThresholdControl;
use crate::infra::ConfigError;

use super::config::CurriculumConfig;
use super::window::SuccessWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurriculumPhase {
    /// Window not yet full; no adjustments
    Warming,
    /// Window full; adjusts after every outcome
    Active,
}

/// Outcome of one adjustment attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Warming { collected: usize, capacity: usize },
    /// No target, or the target refused the new threshold
    Skipped,
    /// Rate inside the neutral band, or the threshold is already at its limit
    Unchanged { rate: f32, threshold: f32 },
    Harder { rate: f32, from: f32, to: f32 },
    Easier { rate: f32, from: f32, to: f32 },
}

impl Adjustment {
    pub fn changed(&self) -> bool {
        matches!(self, Adjustment::Harder { .. } | Adjustment::Easier { .. })
    }

    /// Threshold after the adjustment, when known
    pub fn threshold(&self) -> Option<f32> {
        match self {
            Adjustment::Unchanged { threshold, .. } => Some(*threshold),
            Adjustment::Harder { to, .. } | Adjustment::Easier { to, .. } => Some(*to),
            Adjustment::Warming { .. } | Adjustment::Skipped => None,
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Warming {
                collected,
                capacity,
            } => write!(f, "warming ({}/{})", collected, capacity),
            Adjustment::Skipped => write!(f, "skipped"),
            Adjustment::Unchanged { rate, threshold } => {
                write!(f, "unchanged at {:.5} (rate {:.2})", threshold, rate)
            }
            Adjustment::Harder { rate, from, to } => {
                write!(f, "harder {:.5} -> {:.5} (rate {:.2})", from, to, rate)
            }
            Adjustment::Easier { rate, from, to } => {
                write!(f, "easier {:.5} -> {:.5} (rate {:.2})", from, to, rate)
            }
        }
    }
}

/// Adapts the success radius to keep the windowed success rate near a target
#[derive(Debug, Clone)]
pub struct CurriculumController {
    config: CurriculumConfig,
    window: SuccessWindow,
    phase: CurriculumPhase,
}

impl CurriculumController {
    pub fn new(config: CurriculumConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: SuccessWindow::new(config.window_size),
            config,
            phase: CurriculumPhase::Warming,
        })
    }

    pub fn config(&self) -> &CurriculumConfig {
        &self.config
    }

    pub fn phase(&self) -> CurriculumPhase {
        self.phase
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Success rate over the outcomes collected so far
    pub fn success_rate(&self) -> f32 {
        self.window.rate()
    }

    pub fn record_outcome(&mut self, success: bool) {
        self.window.push(success);

        if self.phase == CurriculumPhase::Warming && self.window.is_full() {
            self.phase = CurriculumPhase::Active;
            info!(
                "Curriculum active after {} episodes (success rate {:.2})",
                self.window.capacity(),
                self.window.rate()
            );
        }
    }

    /// Adjust `target`'s threshold from the current window. Never fails;
    /// a missing target skips the adjustment.
    pub fn maybe_adjust(&mut self, target: Option<&mut dyn ThresholdControl>) -> Adjustment {
        let Some(rate) = self.window.full_rate() else {
            return Adjustment::Warming {
                collected: self.window.len(),
                capacity: self.window.capacity(),
            };
        };
        let Some(target) = target else {
            warn!("Curriculum adjustment skipped: no environment to adjust");
            return Adjustment::Skipped;
        };

        let current = target.distance_threshold();
        let harder = rate > self.config.target_success_rate;
        let easier = rate < self.config.lower_band();

        // Never move the wrong way when the threshold starts outside the limits
        let next = if harder {
            (current * self.config.decay_factor)
                .max(self.config.min_threshold)
                .min(current)
        } else if easier {
            (current * self.config.growth_factor)
                .min(self.config.max_threshold)
                .max(current)
        } else {
            current
        };

        if next == current {
            debug!("Curriculum rate {:.2}, threshold stays {:.5}", rate, current);
            return Adjustment::Unchanged {
                rate,
                threshold: current,
            };
        }

        if let Err(err) = target.set_distance_threshold(next) {
            warn!("Curriculum adjustment skipped: {}", err);
            return Adjustment::Skipped;
        }

        let adjustment = if harder {
            Adjustment::Harder {
                rate,
                from: current,
                to: next,
            }
        } else {
            Adjustment::Easier {
                rate,
                from: current,
                to: next,
            }
        };
        debug!("Curriculum {}", adjustment);
        adjustment
    }

    /// Record an episode outcome and adjust right away
    pub fn observe(
        &mut self,
        success: bool,
        target: Option<&mut dyn ThresholdControl>,
    ) -> Adjustment {
        self.record_outcome(success);
        self.maybe_adjust(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedThreshold;

    fn controller(window: usize) -> CurriculumController {
        CurriculumController::new(CurriculumConfig::default().with_window(window)).unwrap()
    }

    #[test]
    fn test_warming_until_full() {
        let mut curriculum = controller(4);
        let mut target = FixedThreshold::new(0.01);

        for i in 0..3 {
            let adjustment = curriculum.observe(true, Some(&mut target));
            assert_eq!(
                adjustment,
                Adjustment::Warming {
                    collected: i + 1,
                    capacity: 4
                }
            );
            assert_eq!(curriculum.phase(), CurriculumPhase::Warming);
        }
        assert!((target.threshold - 0.01).abs() < 1e-9);

        assert!(curriculum.observe(true, Some(&mut target)).changed());
        assert_eq!(curriculum.phase(), CurriculumPhase::Active);
    }

    #[test]
    fn test_all_successes_shrink_strictly_until_floor() {
        let config = CurriculumConfig::default().with_window(5).with_limits(0.009, 0.1);
        let mut curriculum = CurriculumController::new(config).unwrap();
        let mut target = FixedThreshold::new(0.01);

        for _ in 0..5 {
            curriculum.record_outcome(true);
        }

        let mut previous = target.threshold;
        for _ in 0..20 {
            let adjustment = curriculum.observe(true, Some(&mut target));
            if target.threshold > 0.009 {
                assert!(target.threshold < previous);
                assert!(matches!(adjustment, Adjustment::Harder { .. }));
            }
            assert!(target.threshold >= 0.009);
            previous = target.threshold;
        }

        // Pinned at the floor
        assert!((target.threshold - 0.009).abs() < 1e-9);
        assert!(matches!(
            curriculum.observe(true, Some(&mut target)),
            Adjustment::Unchanged { .. }
        ));
    }

    #[test]
    fn test_all_failures_grow_strictly_until_ceiling() {
        let config = CurriculumConfig::default().with_window(5).with_limits(1e-4, 0.0105);
        let mut curriculum = CurriculumController::new(config).unwrap();
        let mut target = FixedThreshold::new(0.01);

        for _ in 0..4 {
            curriculum.record_outcome(false);
        }

        let before = target.threshold;
        let adjustment = curriculum.observe(false, Some(&mut target));
        assert!(target.threshold > before);
        assert!(matches!(adjustment, Adjustment::Easier { rate, .. } if rate == 0.0));

        for _ in 0..20 {
            curriculum.observe(false, Some(&mut target));
        }
        assert!((target.threshold - 0.0105).abs() < 1e-9);
    }

    #[test]
    fn test_rate_equal_to_target_is_neutral() {
        let mut curriculum = controller(100);
        let mut target = FixedThreshold::new(0.01);

        let mut last = Adjustment::Skipped;
        for _ in 0..80 {
            last = curriculum.observe(true, Some(&mut target));
        }
        for _ in 0..20 {
            assert_eq!(curriculum.phase(), CurriculumPhase::Warming);
            last = curriculum.observe(false, Some(&mut target));
        }

        assert_eq!(curriculum.phase(), CurriculumPhase::Active);
        match last {
            Adjustment::Unchanged { rate, threshold } => {
                assert!((rate - 0.8).abs() < 1e-6);
                assert!((threshold - 0.01).abs() < 1e-9);
            }
            other => panic!("expected no-op, got {:?}", other),
        }
    }

    #[test]
    fn test_sliding_window_keeps_active() {
        let mut curriculum = controller(3);
        let mut target = FixedThreshold::new(0.01);

        for _ in 0..3 {
            curriculum.observe(false, Some(&mut target));
        }
        for _ in 0..10 {
            curriculum.observe(true, Some(&mut target));
            assert_eq!(curriculum.phase(), CurriculumPhase::Active);
            assert_eq!(curriculum.window_len(), 3);
        }
        assert!((curriculum.success_rate() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_banded_neutral_zone() {
        let config = CurriculumConfig::banded(0.2).with_window(10);
        let mut curriculum = CurriculumController::new(config).unwrap();
        let mut target = FixedThreshold::new(0.01);

        // 5/10 sits between the band and the target
        for i in 0..10 {
            curriculum.record_outcome(i % 2 == 0);
        }
        assert!(matches!(
            curriculum.maybe_adjust(Some(&mut target)),
            Adjustment::Unchanged { .. }
        ));

        // Only failures left in the window
        for _ in 0..9 {
            curriculum.record_outcome(false);
        }
        assert!(matches!(
            curriculum.maybe_adjust(Some(&mut target)),
            Adjustment::Easier { .. }
        ));
    }

    #[test]
    fn test_unavailable_target_is_skipped() {
        let mut curriculum = controller(1);
        let mut target = FixedThreshold::new(0.01);
        target.locked = true;

        assert_eq!(curriculum.observe(true, Some(&mut target)), Adjustment::Skipped);
        assert!((target.threshold - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut curriculum = controller(2);

        assert!(matches!(curriculum.observe(true, None), Adjustment::Warming { .. }));
        assert_eq!(curriculum.observe(true, None), Adjustment::Skipped);
        assert_eq!(curriculum.phase(), CurriculumPhase::Active);

        // The outcomes still count once a target is back
        let mut target = FixedThreshold::new(0.01);
        assert!(matches!(
            curriculum.maybe_adjust(Some(&mut target)),
            Adjustment::Harder { .. }
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(CurriculumController::new(CurriculumConfig::default().with_window(0)).is_err());
    }
}
