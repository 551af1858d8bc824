//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Each refresh runs
//! fetch → normalize → build to completion on the loop thread before the next
//! frame is drawn.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, KeyMap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        kpi::KpiTiles,
        notice::{Notice, NoticeKind, EMPTY_MESSAGE},
        orders_table::{OrdersTable, OrdersTableState},
        payment_share::PaymentShareChart,
        revenue_chart::RevenueChart,
        status_bar::{Footer, StatusBar},
        top_items::TopItemsChart,
    },
};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use orderdash_core::{
    config::Config,
    display::format_timestamp,
    metrics::{Dashboard, DashboardOptions, SortKey},
    NormalizedOrders,
};
use orderdash_source::{DocumentSource, OrderFeed, SourceError};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::runtime::Runtime;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Focus + view types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dashboard,
    /// Vim-style `:` command line is active.
    Command,
}

/// What the body of the screen shows for the current refresh cycle.
#[derive(Debug)]
pub enum View {
    /// Nothing fetched yet.
    Loading,
    /// The fetch succeeded but no record survived normalization.
    Empty,
    /// The last fetch failed; holds the error text.
    Failed(String),
    Ready(Box<Dashboard>),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub view: View,
    pub sort: SortKey,
    pub table: OrdersTableState,
    pub focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub keys: KeyMap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Set by `r` / `:refresh`; the loop clears the cache and refetches.
    pub refresh_requested: bool,
    /// Source description for the status bar.
    pub source_label: String,
    /// Wall-clock time of the last successful fetch.
    pub refreshed_at: Option<DateTime<Utc>>,
    pub quit: bool,
}

impl AppState {
    pub fn new(config: Config, theme: Theme, source_label: String) -> Self {
        let keys = KeyMap::from_config(&config.keybindings);
        Self {
            view: View::Loading,
            sort: SortKey::default(),
            table: OrdersTableState::default(),
            focus: Focus::Dashboard,
            theme,
            config,
            keys,
            show_help: false,
            command_bar: CommandBarState::default(),
            refresh_requested: false,
            source_label,
            refreshed_at: None,
            quit: false,
        }
    }

    fn options(&self) -> DashboardOptions {
        DashboardOptions { sort: self.sort, ..self.config.dashboard.options() }
    }

    /// Replace the view with the outcome of a fetch.
    pub fn show_batch(&mut self, result: Result<Arc<NormalizedOrders>, SourceError>, now: DateTime<Utc>) {
        match result {
            Ok(batch) => {
                self.refreshed_at = Some(now);
                self.view = match Dashboard::build(&batch, &self.options()) {
                    Some(dashboard) => {
                        self.table.clamp(dashboard.recent_orders.len());
                        View::Ready(Box::new(dashboard))
                    }
                    None => View::Empty,
                };
            }
            Err(err) => {
                self.view = View::Failed(err.to_string());
            }
        }
    }

    /// Change the table sort and re-sort the rows currently shown.
    pub fn apply_sort(&mut self, key: SortKey) {
        tracing::debug!(column = ?key.column, direction = ?key.direction, "sort");
        self.sort = key;
        if let View::Ready(dashboard) = &mut self.view {
            dashboard.resort(key);
        }
        self.table.reset();
    }

    fn row_count(&self) -> usize {
        match &self.view {
            View::Ready(dashboard) => dashboard.recent_orders.len(),
            _ => 0,
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Help | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            match event {
                AppEvent::Quit => self.quit = true,
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.command_bar.clear();
                    self.focus = Focus::Dashboard;
                }
                AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.focus = Focus::Dashboard;
                        execute_command(self, cmd);
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.focus = Focus::Dashboard;
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        self.command_bar.error = Some(msg);
                    }
                },
                other => self.command_bar.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Help => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::CommandMode => {
                tracing::debug!("entering command mode");
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::Refresh => {
                tracing::debug!("manual refresh requested");
                self.refresh_requested = true;
            }
            AppEvent::SortNext => {
                let key = SortKey { column: self.sort.column.next(), ..self.sort };
                self.apply_sort(key);
            }
            AppEvent::SortFlip => {
                let key = SortKey { direction: self.sort.direction.flip(), ..self.sort };
                self.apply_sort(key);
            }
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}
            other => {
                let total = self.row_count();
                self.table.handle(&other, total);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<S> {
    state: AppState,
    feed: OrderFeed<S>,
    runtime: Runtime,
    last_load: Option<Instant>,
}

impl<S: DocumentSource> App<S> {
    pub fn new(feed: OrderFeed<S>, runtime: Runtime, config: Config, theme: Theme) -> Self {
        let label = feed.source().describe();
        Self { state: AppState::new(config, theme, label), feed, runtime, last_load: None }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let auto_refresh = self.state.config.refresh.auto_refresh();
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if self.state.refresh_requested {
                self.state.refresh_requested = false;
                self.feed.invalidate();
                self.load();
                continue;
            }
            if self.last_load.map_or(true, |at| at.elapsed() >= auto_refresh) {
                self.load();
                continue;
            }

            if ct_event::poll(POLL_INTERVAL)? {
                let raw = ct_event::read()?;
                if let Event::Key(key) = &raw {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                }
                // Use insert-mode mapping while the command bar is open
                let app_event = if self.state.focus == Focus::Command {
                    event::to_app_event_insert(raw)
                } else {
                    event::to_app_event(raw, &self.state.keys)
                };
                if let Some(ev) = app_event {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                    self.state.handle(ev);
                }
            }
        }
        Ok(())
    }

    /// Fetch through the cache and rebuild the view.
    fn load(&mut self) {
        let result = self.runtime.block_on(self.feed.snapshot());
        if let Err(err) = &result {
            tracing::error!(error = %err, "fetch failed");
        }
        self.state.show_batch(result, Utc::now());
        self.last_load = Some(Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line status | body | 1-line footer
    let [status, body, footer] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    let refreshed = state
        .refreshed_at
        .map(|at| format_timestamp(at, &state.config.ui.timestamp_format));
    frame.render_widget(StatusBar::new(&state.source_label, refreshed.as_deref(), &state.theme), status);

    match &state.view {
        View::Loading => {
            frame.render_widget(Notice::new(NoticeKind::Loading, "Fetching orders…", &state.theme), body);
        }
        View::Empty => {
            frame.render_widget(Notice::new(NoticeKind::Warning, EMPTY_MESSAGE, &state.theme), body);
        }
        View::Failed(message) => {
            frame.render_widget(Notice::new(NoticeKind::Error, message, &state.theme), body);
        }
        View::Ready(dashboard) => draw_dashboard(frame, state, dashboard, body),
    }

    let dropped = match &state.view {
        View::Ready(dashboard) => dashboard.dropped,
        _ => 0,
    };
    frame.render_widget(Footer::new(&state.keys, state.sort, dropped), footer);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.keys, &state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
    }
}

fn draw_dashboard(frame: &mut Frame, state: &AppState, dashboard: &Dashboard, area: Rect) {
    let currency = state.config.dashboard.currency_symbol.as_str();

    let [kpis, charts, items, table] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(30),
        Constraint::Length(top_items_height(dashboard.top_items.len())),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [share, revenue] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Fill(1)]).areas(charts);

    frame.render_widget(KpiTiles::new(&dashboard.kpis, currency, &state.theme), kpis);
    frame.render_widget(PaymentShareChart::new(&dashboard.payment_methods, currency, &state.theme), share);
    frame.render_widget(RevenueChart::new(&dashboard.revenue, &state.theme), revenue);
    frame.render_widget(TopItemsChart::new(&dashboard.top_items, &state.theme), items);
    frame.render_widget(
        OrdersTable::new(
            &dashboard.recent_orders,
            &state.table,
            state.sort,
            &state.config.ui.timestamp_format,
            currency,
            &state.theme,
        ),
        table,
    );
}

/// One row per item plus the block borders.
fn top_items_height(items: usize) -> u16 {
    u16::try_from(items).unwrap_or(u16::MAX).saturating_add(2)
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
