//! Forward simulation of fitted networks.
//!
//! [`simulate`] is the core entry point and takes the random generator from the
//! caller. [`SimulationConfig`] and [`SimulateBuilder`] wrap it with a seeded
//! `ChaCha8Rng` for reproducible runs.

pub mod builder;
pub mod config;
pub mod driver;

pub use builder::SimulateBuilder;
pub use config::SimulationConfig;
pub use driver::simulate;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier attached to the diagnostics of one simulation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
