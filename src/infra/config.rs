//! Configuration errors and helpers for reading settings from the process environment

use std::str::FromStr;

use thiserror::Error;

use super::types::Vec3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("envelope bound on axis {axis} is not finite")]
    NonFiniteBound { axis: usize },

    #[error("envelope low bound {low} exceeds high bound {high} on axis {axis}")]
    InvertedBounds { axis: usize, low: f32, high: f32 },

    #[error("max_steps must be at least 1")]
    ZeroMaxSteps,

    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must lie in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f32,
    },

    #[error("curriculum window must hold at least one episode")]
    EmptyWindow,

    #[error("minimum threshold {min} exceeds maximum threshold {max}")]
    InvertedThresholdLimits { min: f32, max: f32 },

    #[error("environment variable {key}={value:?} could not be parsed")]
    InvalidVar { key: String, value: String },
}

/// Source of `KEY=value` settings. The process environment in production, a map in tests.
pub trait VarSource {
    fn var(&self, key: &str) -> Option<String>;
}

impl<F> VarSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Reads from `std::env`, after `dotenv` has merged any `.env` file.
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

pub fn read_var<T: FromStr>(vars: &impl VarSource, key: &str) -> Result<Option<T>, ConfigError> {
    match vars.var(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

/// Reads a comma separated `x,y,z` triple.
pub fn read_vec3(vars: &impl VarSource, key: &str) -> Result<Option<Vec3>, ConfigError> {
    match vars.var(key) {
        Some(value) => parse_vec3(&value).map(Some).ok_or(ConfigError::InvalidVar {
            key: key.to_string(),
            value,
        }),
        None => Ok(None),
    }
}

pub fn parse_vec3(value: &str) -> Option<Vec3> {
    let parts: Vec<f32> = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}
