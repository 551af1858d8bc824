// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use orderdash_core::metrics::{SortColumn, SortDirection, SortKey};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    // Toggle the help popup
    Help,
    // Clear the cache and fetch again
    Refresh,
    // Sort the orders table; direction keeps the current one when omitted
    Sort(SortColumn, Option<SortDirection>),
    // Change theme
    Theme(String),
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "q!" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "r" | "refresh" => Ok(Command::Refresh),
            "sort" => parse_sort(rest),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn parse_sort(args: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: sort <customer|total|method|amount|ordered|paid> [asc|desc]";

    let mut words = args.split_whitespace();
    let column = match words.next() {
        Some(word) => word.parse::<SortColumn>()?,
        None => return Err(USAGE.to_string()),
    };
    let direction = match words.next() {
        None => None,
        Some("asc" | "ascending") => Some(SortDirection::Ascending),
        Some("desc" | "descending") => Some(SortDirection::Descending),
        Some(_) => return Err(USAGE.to_string()),
    };
    if words.next().is_some() {
        return Err(USAGE.to_string());
    }
    Ok(Command::Sort(column, direction))
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Refresh => {
            s.refresh_requested = true;
        }
        Command::Sort(column, direction) => {
            let direction = direction.unwrap_or(s.sort.direction);
            s.apply_sort(SortKey { column, direction });
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
