use rand::Rng;

use super::config::ConfigError;

/// Cartesian coordinate in simulator units (meters)
pub type Vec3 = [f32; 3];

pub fn euclidean_distance(a: &Vec3, b: &Vec3) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Axis-aligned box of reachable pipette positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub low: Vec3,
    pub high: Vec3,
}

impl Envelope {
    pub fn new(low: Vec3, high: Vec3) -> Self {
        Self { low, high }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in 0..3 {
            let (low, high) = (self.low[axis], self.high[axis]);
            if !low.is_finite() || !high.is_finite() {
                return Err(ConfigError::NonFiniteBound { axis });
            }
            if low > high {
                return Err(ConfigError::InvertedBounds { axis, low, high });
            }
        }
        Ok(())
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| point[axis] >= self.low[axis] && point[axis] <= self.high[axis])
    }

    pub fn clamp(&self, point: &Vec3) -> Vec3 {
        std::array::from_fn(|axis| point[axis].clamp(self.low[axis], self.high[axis]))
    }

    pub fn center(&self) -> Vec3 {
        std::array::from_fn(|axis| (self.low[axis] + self.high[axis]) * 0.5)
    }

    /// Map a point linearly onto [-1, 1] per axis. Degenerate axes map to 0.
    pub fn normalize(&self, point: &Vec3) -> Vec3 {
        std::array::from_fn(|axis| {
            let span = self.high[axis] - self.low[axis];
            if span <= 0.0 {
                0.0
            } else {
                (2.0 * (point[axis] - self.low[axis]) / span - 1.0).clamp(-1.0, 1.0)
            }
        })
    }

    /// Uniform sample, inclusive on both ends of every axis.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        std::array::from_fn(|axis| rng.random_range(self.low[axis]..=self.high[axis]))
    }
}

impl Default for Envelope {
    /// Working envelope of the OT-2 pipette, measured by driving each axis into its end stop.
    fn default() -> Self {
        Self {
            low: [-0.187, -0.1705, 0.1695],
            high: [0.253, 0.2195, 0.2908],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_euclidean_distance() {
        assert!((euclidean_distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]) - 5.0).abs() < 1e-6);
        assert_eq!(euclidean_distance(&[0.1, 0.2, 0.3], &[0.1, 0.2, 0.3]), 0.0);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let envelope = Envelope::new([0.0, 0.5, 0.0], [1.0, 0.4, 1.0]);
        assert_eq!(
            envelope.validate(),
            Err(ConfigError::InvertedBounds {
                axis: 1,
                low: 0.5,
                high: 0.4
            })
        );

        let envelope = Envelope::new([0.0, 0.0, f32::NAN], [1.0, 1.0, 1.0]);
        assert_eq!(envelope.validate(), Err(ConfigError::NonFiniteBound { axis: 2 }));
    }

    #[test]
    fn test_samples_stay_inside() {
        let envelope = Envelope::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let point = envelope.sample(&mut rng);
            assert!(envelope.contains(&point), "{:?} escaped the envelope", point);
        }
    }

    #[test]
    fn test_degenerate_axis_samples_the_bound() {
        let envelope = Envelope::new([0.1, 0.2, 0.3], [0.1, 0.4, 0.3]);
        let mut rng = StdRng::seed_from_u64(1);
        let point = envelope.sample(&mut rng);
        assert_eq!(point[0], 0.1);
        assert_eq!(point[2], 0.3);
    }

    #[test]
    fn test_normalize() {
        let envelope = Envelope::new([0.0, -1.0, 2.0], [1.0, 1.0, 2.0]);
        let normalized = envelope.normalize(&[0.5, 1.0, 2.0]);
        assert!((normalized[0] - 0.0).abs() < 1e-6);
        assert!((normalized[1] - 1.0).abs() < 1e-6);
        assert_eq!(normalized[2], 0.0);

        // Outside the box clamps to the edge
        let normalized = envelope.normalize(&[3.0, -5.0, 2.0]);
        assert_eq!(normalized[0], 1.0);
        assert_eq!(normalized[1], -1.0);
    }
}
