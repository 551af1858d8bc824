//! Recent-orders table: the scrollable, sortable pane at the bottom.
//!
//! # Navigation
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor up one row (scrolls view if needed) |
//! | `↓` / `j` | Move cursor down one row |
//! | `PageUp` / `Ctrl+u` | Move up one page |
//! | `PageDown` / `Ctrl+d` | Move down one page |
//! | `g` / `Home` | Jump to the first row |
//!
//! `offset` is the index of the first visible row and `cursor` the absolute
//! index of the highlighted row. The cursor is always kept inside the visible
//! window; moving it past an edge scrolls.

use std::cell::Cell as HeightCell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use orderdash_core::display::{format_money, format_timestamp};
use orderdash_core::metrics::{RecentOrder, SortColumn, SortKey};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Cell, Row, Table, Widget},
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct OrdersTableState {
    /// Index of the first visible row.
    pub offset: usize,
    /// Absolute index of the highlighted row.
    pub cursor: usize,
    /// Body height from the last render so `handle()` knows the page size.
    last_height: HeightCell<usize>,
}

impl Default for OrdersTableState {
    fn default() -> Self {
        Self { offset: 0, cursor: 0, last_height: HeightCell::new(PAGE_STEP) }
    }
}

impl OrdersTableState {
    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// Back to the first row, e.g. after a resort.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.cursor = 0;
    }

    /// Keep cursor and offset valid after the row count changed.
    pub fn clamp(&mut self, total: usize) {
        self.cursor = self.cursor.min(total.saturating_sub(1));
        self.follow_cursor();
    }

    fn follow_cursor(&mut self) {
        let height = self.height();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    /// Handle a navigation event against a table of `total` rows.
    pub fn handle(&mut self, event: &AppEvent, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        let last = total - 1;
        match event {
            AppEvent::Nav(Direction::Up) => self.cursor = self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.cursor = (self.cursor + 1).min(last),
            AppEvent::PageUp => self.cursor = self.cursor.saturating_sub(self.height().min(PAGE_STEP)),
            AppEvent::PageDown => self.cursor = (self.cursor + self.height().min(PAGE_STEP)).min(last),
            AppEvent::Top => self.cursor = 0,
            _ => return,
        }
        self.follow_cursor();
        tracing::debug!(cursor = self.cursor, offset = self.offset, "orders table: moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct OrdersTable<'a> {
    rows: &'a [RecentOrder],
    state: &'a OrdersTableState,
    sort: SortKey,
    timestamp_format: &'a str,
    currency: &'a str,
    theme: &'a Theme,
}

impl<'a> OrdersTable<'a> {
    pub fn new(
        rows: &'a [RecentOrder],
        state: &'a OrdersTableState,
        sort: SortKey,
        timestamp_format: &'a str,
        currency: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self { rows, state, sort, timestamp_format, currency, theme }
    }

    fn header(&self) -> Row<'a> {
        let cells = SortColumn::ALL.iter().map(|column| {
            if *column == self.sort.column {
                Cell::from(Span::styled(
                    format!("{} {}", column.title(), self.sort.direction.arrow()),
                    self.theme.table_sorted,
                ))
            } else {
                Cell::from(column.title())
            }
        });
        Row::new(cells).style(self.theme.table_header)
    }

    fn cells(&self, order: &RecentOrder) -> [String; 6] {
        let money = |v: Option<_>| v.map(|v| format_money(v, self.currency)).unwrap_or_default();
        [
            order.customer_id.clone(),
            money(order.order_total),
            order.payment_method.clone().unwrap_or_default(),
            money(order.payment_amount),
            format_timestamp(order.order_time, self.timestamp_format),
            format_timestamp(order.payment_time, self.timestamp_format),
        ]
    }
}

impl Widget for OrdersTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Line::from(format!(" Recent Orders ({}) ", self.rows.len())))
            .border_style(self.theme.border_focused);
        // Border plus header row.
        let body_height = block.inner(area).height.saturating_sub(1) as usize;
        self.state.last_height.set(body_height.max(1));

        let start = self.state.offset.min(self.rows.len());
        let end = (start + body_height).min(self.rows.len());
        let rows: Vec<Row> = self.rows[start..end]
            .iter()
            .enumerate()
            .map(|(idx, order)| {
                let row = Row::new(self.cells(order));
                if start + idx == self.state.cursor {
                    row.style(self.theme.table_highlight)
                } else {
                    row
                }
            })
            .collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(self.timestamp_width()),
            Constraint::Length(self.timestamp_width()),
        ];
        Table::new(rows, widths).header(self.header()).block(block).render(area, buf);
    }
}

impl OrdersTable<'_> {
    fn timestamp_width(&self) -> u16 {
        self.rows
            .first()
            .map(|o| format_timestamp(o.order_time, self.timestamp_format).chars().count() as u16)
            .unwrap_or(19)
            .max(8)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
