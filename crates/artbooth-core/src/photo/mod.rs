//! Photo validation.
//!
//! Submitted photos are checked once, before any external call, and the
//! resulting [`ValidatedImage`] is what the pipeline consumes afterwards.

mod validation;

pub use validation::{ImageLimits, ImageValidator, ValidatedImage};
