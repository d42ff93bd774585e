//! Booth session services.
//!
//! - `context`: collaborators shared by every session
//! - `usecase`: one session's transitions and pipeline driver
//! - `registry`: in-memory sessions keyed by id

mod context;
mod registry;
mod usecase;

pub use context::BoothContext;
pub use registry::SessionRegistry;
pub use usecase::BoothSession;
