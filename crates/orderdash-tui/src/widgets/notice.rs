//! Full-body message panel shown instead of the dashboard while loading, when
//! the collection is empty, or when the last fetch failed.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

pub const EMPTY_MESSAGE: &str = "No data found in collection yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loading,
    Warning,
    Error,
}

pub struct Notice<'a> {
    kind: NoticeKind,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> Notice<'a> {
    pub fn new(kind: NoticeKind, message: &'a str, theme: &'a Theme) -> Self {
        Self { kind, message, theme }
    }

    fn style_and_title(&self) -> (Style, &'static str) {
        match self.kind {
            NoticeKind::Loading => (self.theme.loading, " Loading "),
            NoticeKind::Warning => (self.theme.warning, " Warning "),
            NoticeKind::Error => (self.theme.error, " Error "),
        }
    }
}

impl Widget for Notice<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (style, title) = self.style_and_title();
        // Vertically centre the message inside the panel.
        let pad = area.height.saturating_sub(3) / 2;
        let mut lines = vec![Line::default(); pad as usize];
        lines.push(Line::from(Span::styled(self.message, style)));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(title).border_style(style))
            .render(area, buf);
    }
}
