//! Top items by total quantity, as a horizontal bar chart.

use crate::theme::Theme;
use orderdash_core::ItemSummary;
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Widget},
};

pub struct TopItemsChart<'a> {
    items: &'a [ItemSummary],
    theme: &'a Theme,
}

impl<'a> TopItemsChart<'a> {
    pub fn new(items: &'a [ItemSummary], theme: &'a Theme) -> Self {
        Self { items, theme }
    }
}

impl Widget for TopItemsChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars: Vec<Bar> = self
            .items
            .iter()
            .map(|item| {
                Bar::default()
                    .value(item.total_quantity)
                    .label(Line::from(item.item_name.clone()))
                    .text_value(item.total_quantity.to_string())
                    .style(self.theme.bar)
                    .value_style(self.theme.bar_value)
            })
            .collect();

        BarChart::default()
            .block(
                Block::bordered()
                    .title(" Top Items by Quantity ")
                    .border_style(self.theme.border_unfocused),
            )
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}
