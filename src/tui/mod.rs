//! Terminal User Interface module
//!
//! An interactive budget grid built on ratatui: move between cells with the
//! keyboard, type amounts, add and rename rows and groups, and change the
//! month range while the totals update underneath.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

// Keybindings
pub mod keybindings;

pub use app::App;
pub use terminal::run_tui;
