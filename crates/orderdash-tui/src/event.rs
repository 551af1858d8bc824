//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! The refresh and sort keys come from the `[keybindings]` config section via
//! [`KeyMap`]; the rest are fixed.
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `r` (configurable)      | `Refresh`                  |
//! | `s` (configurable)      | `SortNext`                 |
//! | `S` (configurable)      | `SortFlip`                 |
//! | `?`                     | `Help`                     |
//! | `:`                     | `CommandMode`              |
//! | `PageUp`, `Ctrl+u`      | `PageUp`                   |
//! | `PageDown`, `Ctrl+d`    | `PageDown`                 |
//! | `g` / `Home`            | `Top`                      |
//! | `↑` / `k`               | `Nav(Up)`                  |
//! | `↓` / `j`               | `Nav(Down)`                |
//! | `Enter`, `Esc`          | `Enter`, `Escape`          |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! While the command bar is open the loop calls [`to_app_event_insert`]:
//! every printable character is forwarded as `Char`, arrow keys still move
//! the cursor, and only `Ctrl+c`, `Escape`, `Enter` and `Backspace` keep
//! their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use orderdash_core::config::KeybindingsConfig;

/// Direction for table and cursor navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Clear the fetch cache and query the source again.
    Refresh,
    /// Sort the orders table by the next column.
    SortNext,
    /// Reverse the orders table sort direction.
    SortFlip,
    /// Toggle the help popup.
    Help,
    /// Open the `:` command bar.
    CommandMode,
    PageUp,
    PageDown,
    /// Jump to the first row of the orders table.
    Top,
    Nav(Direction),
    /// A printable character forwarded to the command bar.
    Char(char),
    Backspace,
    Enter,
    Escape,
    Resize(u16, u16),
}

/// The configurable part of the key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    pub refresh: char,
    pub sort_next: char,
    pub sort_flip: char,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self { refresh: 'r', sort_next: 's', sort_flip: 'S' }
    }
}

impl KeyMap {
    /// Take the first character of each configured binding, keeping the
    /// default for empty entries.
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let defaults = Self::default();
        let first = |s: &str, fallback: char| s.chars().next().unwrap_or(fallback);
        Self {
            refresh: first(&config.refresh, defaults.refresh),
            sort_next: first(&config.sort_next, defaults.sort_next),
            sort_flip: first(&config.sort_flip, defaults.sort_flip),
        }
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal mode).
///
/// Returns `None` for events with no meaning to the dashboard (mouse
/// events, unbound keys).
pub fn to_app_event(event: Event, keys: &KeyMap) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key, keys),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] while the command bar is
/// open.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent, keys: &KeyMap) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    let plain = key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageUp),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageDown),

        // Configurable keys are checked before the fixed ones so a user can
        // rebind e.g. refresh to `g`.
        Char(c) if plain && c == keys.refresh => Some(AppEvent::Refresh),
        Char(c) if plain && c == keys.sort_next => Some(AppEvent::SortNext),
        Char(c) if plain && c == keys.sort_flip => Some(AppEvent::SortFlip),

        Char('q') if plain => Some(AppEvent::Quit),
        Char('?') if plain => Some(AppEvent::Help),
        Char(':') if plain => Some(AppEvent::CommandMode),
        Char('g') if plain => Some(AppEvent::Top),
        Char('k') if plain => Some(AppEvent::Nav(Direction::Up)),
        Char('j') if plain => Some(AppEvent::Nav(Direction::Down)),

        Home => Some(AppEvent::Top),
        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),
        PageUp => Some(AppEvent::PageUp),
        PageDown => Some(AppEvent::PageDown),

        Enter => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace => Some(AppEvent::Backspace),
        Enter => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
