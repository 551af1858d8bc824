//! Ratatui widgets for the orderdash TUI.

pub mod command_bar;
pub mod help;
pub mod kpi;
pub mod notice;
pub mod orders_table;
pub mod payment_share;
pub mod revenue_chart;
pub mod status_bar;
pub mod top_items;
