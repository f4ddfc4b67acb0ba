//! Configuration module for Budget Builder
//!
//! - XDG-compliant path resolution
//! - User settings (display and startup preferences)

pub mod paths;
pub mod settings;

pub use paths::BuilderPaths;
pub use settings::Settings;
