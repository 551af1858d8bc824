//! Payment-method share: one proportional bar per method with its
//! percentage of all orders and the amount paid through it.

use crate::theme::Theme;
use orderdash_core::display::{format_money, format_share};
use orderdash_core::metrics::PaymentShare;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use rust_decimal::prelude::ToPrimitive;

const LABEL_WIDTH: usize = 12;

pub struct PaymentShareChart<'a> {
    shares: &'a [PaymentShare],
    currency: &'a str,
    theme: &'a Theme,
}

impl<'a> PaymentShareChart<'a> {
    pub fn new(shares: &'a [PaymentShare], currency: &'a str, theme: &'a Theme) -> Self {
        Self { shares, currency, theme }
    }

    fn line(&self, share: &PaymentShare, width: usize) -> Line<'a> {
        let tail = format!(" {} {}", format_share(share.share), format_money(share.amount, self.currency));
        let room = width.saturating_sub(LABEL_WIDTH + 1 + tail.chars().count());
        let fill = bar_cells(share.share.to_f64().unwrap_or(0.0), room);
        Line::from(vec![
            Span::raw(format!("{:<LABEL_WIDTH$.LABEL_WIDTH$} ", share.method)),
            Span::styled("█".repeat(fill), self.theme.payment_style(&share.method)),
            Span::raw(tail),
        ])
    }
}

/// Number of cells a bar for `fraction` gets out of `room`; any non-zero
/// share shows at least one cell.
fn bar_cells(fraction: f64, room: usize) -> usize {
    if fraction <= 0.0 || room == 0 {
        return 0;
    }
    ((fraction.min(1.0) * room as f64).round() as usize).clamp(1, room)
}

impl Widget for PaymentShareChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Payment Method Share ")
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        let lines: Vec<Line> =
            self.shares.iter().map(|share| self.line(share, inner.width as usize)).collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdash_core::metrics::payment_method_share;
    use orderdash_core::normalizer::normalize;
    use serde_json::json;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn percentage_follows_order_count_not_amount() {
        let docs: Vec<_> = [("card", 90), ("cash", 10)]
            .into_iter()
            .map(|(method, amount)| {
                json!({
                    "PAYMENT_METHOD": method,
                    "PAYMENT_AMOUNT": amount,
                    "ORDER_TIME": "2024-01-01T10:00:00Z",
                    "PAYMENT_TIME": "2024-01-01T10:01:00Z"
                })
            })
            .collect();
        let shares = payment_method_share(&normalize(&docs).orders);
        let theme = Theme::load_default();
        let chart = PaymentShareChart::new(&shares, "$", &theme);

        let lines: Vec<String> = shares.iter().map(|share| text(&chart.line(share, 60))).collect();
        assert!(lines[0].contains("50.0%") && lines[0].contains("$90.00"), "{}", lines[0]);
        assert!(lines[1].contains("50.0%") && lines[1].contains("$10.00"), "{}", lines[1]);
    }

    #[test]
    fn bar_scales_to_room() {
        assert_eq!(bar_cells(0.5, 20), 10);
        assert_eq!(bar_cells(1.0, 20), 20);
        assert_eq!(bar_cells(0.001, 20), 1);
        assert_eq!(bar_cells(0.0, 20), 0);
        assert_eq!(bar_cells(0.5, 0), 0);
    }
}
