//! Per-node samplers.
//!
//! Every sampler writes exactly `rows` values and draws from the caller's RNG
//! row by row, so a run is reproducible given the same generator state.

pub mod configuration;
pub(crate) mod discrete;
pub(crate) mod gaussian;

pub use configuration::configuration_index;
