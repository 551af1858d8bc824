//! Three summary tiles: total revenue, order count, average order value.

use crate::theme::Theme;
use orderdash_core::display::format_money;
use orderdash_core::metrics::Kpis;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct KpiTiles<'a> {
    kpis: &'a Kpis,
    currency: &'a str,
    theme: &'a Theme,
}

impl<'a> KpiTiles<'a> {
    pub fn new(kpis: &'a Kpis, currency: &'a str, theme: &'a Theme) -> Self {
        Self { kpis, currency, theme }
    }

    fn tiles(&self) -> [(&'static str, String); 3] {
        let average = match self.kpis.average_order_value {
            Some(value) => format_money(value, self.currency),
            None => "—".to_string(),
        };
        [
            ("Total Revenue", format_money(self.kpis.total_revenue, self.currency)),
            ("Number of Orders", self.kpis.order_count.to_string()),
            ("Average Order Value", average),
        ]
    }
}

impl Widget for KpiTiles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cells = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
        for ((label, value), cell) in self.tiles().into_iter().zip(cells.iter()) {
            let block = Block::bordered()
                .title(Span::styled(format!(" {label} "), self.theme.kpi_label))
                .border_style(self.theme.border_unfocused);
            Paragraph::new(Line::from(Span::styled(value, self.theme.kpi_value)))
                .centered()
                .block(block)
                .render(*cell, buf);
        }
    }
}
