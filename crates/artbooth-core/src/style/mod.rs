//! Style catalog domain module.
//!
//! - `model`: a single catalog entry (`StyleEntry`)
//! - `catalog`: the read-only catalog and the built-in style set

mod catalog;
mod model;

pub use catalog::{StyleCatalog, builtin_styles};
pub use model::StyleEntry;
