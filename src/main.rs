use clap::{Parser, Subcommand};
use orderdash::config::{Config, SourceKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orderdash", about = "Live order and payment dashboard")]
struct Cli {
    /// Write debug logs to $TMPDIR/orderdash-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/orderdash/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read orders from a JSON / NDJSON file instead of the database.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Serve the dashboard over HTTP instead of drawing it in the terminal.
    Serve {
        /// Address to listen on, overriding `[server] bind`.
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.file {
        config.source.kind = SourceKind::File;
        config.source.path = path;
    }

    match cli.command {
        Some(Mode::Serve { bind }) => {
            init_stderr_logging(cli.debug);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(orderdash::serve::run(config, bind))
        }
        None => {
            if cli.debug {
                init_file_logging()?;
            }
            orderdash_tui::run(config)
        }
    }
}

/// The terminal belongs to the UI, so TUI logs go to a file.
fn init_file_logging() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("orderdash-debug.log");
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
    tracing::info!("orderdash debug log started, tail -f {}", path.display());
    Ok(())
}

fn init_stderr_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(false)
        .compact()
        .init();
}
