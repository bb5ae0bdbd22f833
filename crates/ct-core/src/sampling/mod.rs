//! Discrete sampling and sequence generation for context-tree sources.

pub mod generator;
pub mod sampler;

pub use generator::{generate, seeded_rng, MarkovSource};
pub use sampler::DiscreteSampler;
