//! Revenue over time: a line chart of bucketed payment amounts keyed by
//! payment time.

use crate::theme::Theme;
use orderdash_core::metrics::RevenuePoint;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};
use rust_decimal::prelude::ToPrimitive;

pub struct RevenueChart<'a> {
    points: &'a [RevenuePoint],
    theme: &'a Theme,
}

impl<'a> RevenueChart<'a> {
    pub fn new(points: &'a [RevenuePoint], theme: &'a Theme) -> Self {
        Self { points, theme }
    }
}

/// `(unix seconds, revenue)` pairs for the chart.
fn series(points: &[RevenuePoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (p.at.timestamp() as f64, p.revenue.to_f64().unwrap_or(0.0)))
        .collect()
}

/// Axis bounds widened so a single point (or a flat line) still has a span.
fn bounds(values: impl Iterator<Item = f64>, floor_zero: bool) -> [f64; 2] {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if floor_zero {
        lo = lo.min(0.0);
    }
    if hi - lo < f64::EPSILON {
        hi = lo + 1.0;
    }
    [lo, hi]
}

impl Widget for RevenueChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let data = series(self.points);
        let x_bounds = bounds(data.iter().map(|(x, _)| *x), false);
        let y_bounds = bounds(data.iter().map(|(_, y)| *y), true);

        let x_labels: Vec<String> = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => vec![
                first.at.format("%m-%d %H:%M").to_string(),
                last.at.format("%m-%d %H:%M").to_string(),
            ],
            _ => Vec::new(),
        };
        let y_labels = vec![format!("{:.0}", y_bounds[0]), format!("{:.0}", y_bounds[1])];

        let dataset = Dataset::default()
            .name("revenue")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(self.theme.chart_line)
            .data(&data);

        Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .title(" Revenue Over Time ")
                    .border_style(self.theme.border_unfocused),
            )
            .x_axis(Axis::default().style(self.theme.chart_axis).bounds(x_bounds).labels(x_labels))
            .y_axis(Axis::default().style(self.theme.chart_axis).bounds(y_bounds).labels(y_labels))
            .legend_position(None)
            .render(area, buf);
    }
}
