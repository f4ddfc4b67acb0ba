//! Modal dialogs for the grid editor

pub mod confirm;
pub mod help;
pub mod range;
pub mod rename;
