//! One-line title strip at the top of the screen and the hint footer at the
//! bottom.

use crate::event::KeyMap;
use crate::theme::Theme;
use orderdash_core::metrics::SortKey;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Title, data source, and the time of the last successful fetch.
pub struct StatusBar<'a> {
    source: &'a str,
    refreshed: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(source: &'a str, refreshed: Option<&'a str>, theme: &'a Theme) -> Self {
        Self { source, refreshed, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" Orders & Payments Dashboard ", self.theme.title),
            Span::styled(format!(" {} ", self.source), Style::default().add_modifier(Modifier::DIM)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);

        if let Some(at) = self.refreshed {
            let stamp = format!(" refreshed {at} ");
            let x = area.right().saturating_sub(stamp.chars().count() as u16);
            buf.set_string(x, area.y, stamp, Style::default().add_modifier(Modifier::DIM));
        }
    }
}

/// Keybinding hints plus the current sort and dropped-record count.
pub struct Footer<'a> {
    keys: &'a KeyMap,
    sort: SortKey,
    dropped: usize,
}

impl<'a> Footer<'a> {
    pub fn new(keys: &'a KeyMap, sort: SortKey, dropped: usize) -> Self {
        Self { keys, sort, dropped }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let hint = format!(
            " {}:refresh  {}:sort  {}:reverse  ?:help  q:quit ",
            self.keys.refresh, self.keys.sort_next, self.keys.sort_flip
        );
        buf.set_string(area.x, area.y, &hint, dim);

        let mut right = format!(" sorted by {} {} ", self.sort.column, self.sort.direction.arrow());
        if self.dropped > 0 {
            right = format!(" {} skipped ·{right}", self.dropped);
        }
        let x = area.right().saturating_sub(right.chars().count() as u16);
        if x > area.x + hint.chars().count() as u16 {
            buf.set_string(x, area.y, right, dim);
        }
    }
}
