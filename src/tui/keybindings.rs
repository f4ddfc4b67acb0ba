//! Keybinding definitions
//!
//! The table behind the help dialog. Dispatch itself lives in the handler.

use crossterm::event::{KeyCode, KeyModifiers};

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    /// Extra key shown alongside the primary one, e.g. vim-style aliases
    pub alias: Option<KeyCode>,
    pub description: &'static str,
    pub context: KeyContext,
}

/// Context in which a keybinding is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Global,
    /// Normal mode on the grid
    Grid,
    /// Editing a cell
    Editing,
    Dialog,
}

impl KeyContext {
    pub fn title(&self) -> &'static str {
        match self {
            KeyContext::Global => "Global Keys",
            KeyContext::Grid => "Budget Grid",
            KeyContext::Editing => "Editing a Cell",
            KeyContext::Dialog => "Dialogs",
        }
    }
}

const fn bind(
    key: KeyCode,
    alias: Option<KeyCode>,
    description: &'static str,
    context: KeyContext,
) -> Keybinding {
    Keybinding {
        key,
        modifiers: KeyModifiers::NONE,
        alias,
        description,
        context,
    }
}

/// All keybindings
pub static KEYBINDINGS: &[Keybinding] = &[
    // Global
    bind(KeyCode::Char('q'), None, "Quit", KeyContext::Global),
    bind(KeyCode::Char('?'), None, "Help", KeyContext::Global),
    // Grid
    bind(KeyCode::Up, Some(KeyCode::Char('k')), "Move up", KeyContext::Grid),
    bind(KeyCode::Down, Some(KeyCode::Char('j')), "Move down", KeyContext::Grid),
    bind(KeyCode::Left, Some(KeyCode::Char('h')), "Previous month", KeyContext::Grid),
    bind(KeyCode::Right, Some(KeyCode::Char('l')), "Next month", KeyContext::Grid),
    bind(KeyCode::Tab, None, "Next cell (last month: next row or new row)", KeyContext::Grid),
    bind(KeyCode::Enter, None, "Insert row in this group", KeyContext::Grid),
    bind(KeyCode::Char('e'), Some(KeyCode::F(2)), "Edit cell", KeyContext::Grid),
    bind(KeyCode::Char('0'), None, "Type a number to start editing", KeyContext::Grid),
    bind(KeyCode::Backspace, Some(KeyCode::Delete), "Clear cell", KeyContext::Grid),
    bind(KeyCode::Char('f'), None, "Apply value to all months", KeyContext::Grid),
    bind(KeyCode::Char('n'), None, "Add row", KeyContext::Grid),
    bind(KeyCode::Char('r'), None, "Rename row", KeyContext::Grid),
    bind(KeyCode::Char('R'), None, "Rename group", KeyContext::Grid),
    bind(KeyCode::Char('i'), None, "Add income group", KeyContext::Grid),
    bind(KeyCode::Char('x'), None, "Add expense group", KeyContext::Grid),
    Keybinding {
        key: KeyCode::Char('d'),
        modifiers: KeyModifiers::CONTROL,
        alias: None,
        description: "Delete row",
        context: KeyContext::Grid,
    },
    bind(KeyCode::Char('p'), None, "Set month range", KeyContext::Grid),
    bind(KeyCode::Char('['), Some(KeyCode::Char(']')), "End month back/forward", KeyContext::Grid),
    bind(KeyCode::Char('{'), Some(KeyCode::Char('}')), "Start month back/forward", KeyContext::Grid),
    // Editing
    bind(KeyCode::Enter, None, "Save value", KeyContext::Editing),
    bind(KeyCode::Tab, None, "Save and move to the next cell", KeyContext::Editing),
    bind(KeyCode::Esc, None, "Discard edit", KeyContext::Editing),
    // Dialog
    bind(KeyCode::Esc, None, "Close dialog", KeyContext::Dialog),
    bind(KeyCode::Enter, None, "Confirm", KeyContext::Dialog),
    bind(KeyCode::Tab, None, "Next field (range)", KeyContext::Dialog),
];

/// Keybindings of one context, in table order
pub fn get_keybindings(context: KeyContext) -> Vec<&'static Keybinding> {
    KEYBINDINGS
        .iter()
        .filter(|kb| kb.context == context)
        .collect()
}

fn format_key(key: KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        other => format!("{:?}", other),
    }
}

/// Format a keybinding for display
pub fn format_keybinding(kb: &Keybinding) -> String {
    let mut parts = Vec::new();

    if kb.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if kb.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    parts.push(format_key(kb.key));

    let primary = parts.join("+");
    match kb.alias {
        Some(alias) => format!("{}/{}", primary, format_key(alias)),
        None => primary,
    }
}
