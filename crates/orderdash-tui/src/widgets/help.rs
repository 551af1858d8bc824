//! Help popup: centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::event::KeyMap;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    keys: &'a KeyMap,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keys: &'a KeyMap, theme: &'a Theme) -> Self {
        Self { keys, theme }
    }

    fn bindings(&self) -> Vec<(String, &'static str)> {
        vec![
            ("q  /  Ctrl+c".to_string(), "Quit"),
            (self.keys.refresh.to_string(), "Clear cache and refresh data"),
            (self.keys.sort_next.to_string(), "Sort orders by next column"),
            (self.keys.sort_flip.to_string(), "Reverse sort direction"),
            ("↑ k  /  ↓ j".to_string(), "Move through recent orders"),
            ("PageUp  /  Ctrl+u".to_string(), "Scroll orders up a page"),
            ("PageDown / Ctrl+d".to_string(), "Scroll orders down a page"),
            ("g  /  Home".to_string(), "Jump to first order"),
            (":".to_string(), "Command bar (q, refresh, sort, theme, help)"),
            ("?".to_string(), "Toggle this help popup"),
        ]
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bindings = self.bindings();
        let popup = centered_rect(72, bindings.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" orderdash — keybindings (? to close) ")
            .border_style(self.theme.border_focused.add_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = bindings
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {key:<22}"), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect { x, y, width: width.min(area.width), height: height.min(area.height) }
}
