//! orderdash TUI: ratatui dashboard shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use orderdash_core::config::Config;
use orderdash_source::{AnySource, OrderFeed};

/// Open the configured source and run the terminal dashboard until quit.
///
/// Fetches run on a current-thread tokio runtime owned by the event loop.
pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let source = runtime.block_on(AnySource::open(&config.source))?;
    let feed = OrderFeed::new(source, config.refresh.cache_ttl());
    let theme = theme::Theme::by_name(&config.ui.theme);
    tracing::info!(theme = %config.ui.theme, "starting dashboard");
    App::new(feed, runtime, config, theme).run()
}
