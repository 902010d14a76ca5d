pub mod config;
mod types;

pub use config::{ConfigError, ProcessEnv, VarSource};
pub use types::{Envelope, Vec3, euclidean_distance};
