//! Artifact publishing domain module.
//!
//! - `artifact`: the generated image plus the metadata needed to publish it
//! - `strategy`: the `PublishStrategy` capability and its error type

mod artifact;
mod strategy;

pub use artifact::{Artifact, Publication, Visibility, slugify};
pub use strategy::{PublishStrategy, StrategyError};
