//! Infrastructure layer for Artbooth.
//!
//! File-backed configuration and secrets, the download page renderer, and
//! the HTTP publish strategies.

pub mod config_service;
pub mod document;
pub mod paths;
pub mod publish;
pub mod secret_service;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::BoothPaths;
pub use secret_service::SecretServiceImpl;
