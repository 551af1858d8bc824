//! Colour theme for the orderdash TUI.
//!
//! Themes are defined as TOML files. Both bundled themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Resolve one at startup with [`Theme::by_name`] and pass the result
//! through the application as a shared reference.
//!
//! # Colour assignment for payment methods
//!
//! Method names are hashed to a stable index into the palette so the same
//! method always gets the same colour, regardless of its rank in the share
//! chart on a given refresh.

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawTitle {
    style: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
    command_bar: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawKpi {
    label: RawStyle,
    value: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawNotice {
    warning: RawStyle,
    error: RawStyle,
    loading: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawChart {
    line: RawStyle,
    axis: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBars {
    top_items: RawStyle,
    value: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    header: RawStyle,
    highlight: RawStyle,
    sorted: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawPayments {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    title: RawTitle,
    borders: RawBorders,
    kpi: RawKpi,
    notice: RawNotice,
    chart: RawChart,
    bars: RawBars,
    table: RawTable,
    payments: RawPayments,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
///
/// All styles are pre-resolved ratatui [`Style`] values, so rendering never
/// touches the TOML again.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Dashboard title in the status bar.
    pub title: Style,

    pub border_focused: Style,
    pub border_unfocused: Style,
    /// Border style for the command bar pane
    pub border_command_bar: Style,

    pub kpi_label: Style,
    pub kpi_value: Style,

    /// "No data" panel.
    pub warning: Style,
    /// Fetch failure panel.
    pub error: Style,
    pub loading: Style,

    pub chart_line: Style,
    pub chart_axis: Style,

    pub bar: Style,
    pub bar_value: Style,

    pub table_header: Style,
    /// Row under the table cursor.
    pub table_highlight: Style,
    /// Header cell of the column the table is sorted by.
    pub table_sorted: Style,

    /// Ordered colour palette used for payment method colours.
    payment_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. The theme is compiled into
    /// the binary and covered by tests, so this should never happen in
    /// practice.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme by the name used in `[ui] theme` and `:theme`.
    /// Unknown names fall back to the default theme.
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            "default" => Self::load_default(),
            other => {
                tracing::debug!(theme = other, "unknown theme, using default");
                Self::load_default()
            }
        }
    }

    /// Parse a theme from a TOML string.
    ///
    /// Unknown keys are ignored so user themes stay forward-compatible.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            title: raw.title.style.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            kpi_label: raw.kpi.label.into_style(),
            kpi_value: raw.kpi.value.into_style(),
            warning: raw.notice.warning.into_style(),
            error: raw.notice.error.into_style(),
            loading: raw.notice.loading.into_style(),
            chart_line: raw.chart.line.into_style(),
            chart_axis: raw.chart.axis.into_style(),
            bar: raw.bars.top_items.into_style(),
            bar_value: raw.bars.value.into_style(),
            table_header: raw.table.header.into_style(),
            table_highlight: raw.table.highlight.into_style(),
            table_sorted: raw.table.sorted.into_style(),
            payment_palette: raw.payments.palette.iter().filter_map(|s| parse_color(s)).collect(),
        })
    }

    /// Return a stable [`Style`] for a payment method name.
    pub fn payment_style(&self, method: &str) -> Style {
        if self.payment_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(method) % self.payment_palette.len();
        Style::default().fg(self.payment_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style hash that is stable across Rust versions and process restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes().fold(5381usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, etc.
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
