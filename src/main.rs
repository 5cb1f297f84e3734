use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::sync::mpsc;

mod app;
mod config;
mod grid;
mod models;
mod store;
mod ui;

use config::settings::Settings;
use grid::HeaderRow;
use store::{run_fetch_worker, Collection, SqliteSource};
use ui::app::TuiApp;
use ui::theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "datagrid-tui")]
#[command(about = "Terminal UI for browsing sortable record collections")]
#[command(version)]
struct Args {
    /// JSON records file (array of flat objects)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// SQLite database path (use :memory: for in-memory)
    #[arg(short, long)]
    database: Option<String>,

    /// Table to browse from the database
    #[arg(short, long)]
    table: Option<String>,

    /// Rows per page (enables client-side paging for --file)
    #[arg(short, long)]
    page_size: Option<usize>,

    /// Column definitions file (JSON)
    #[arg(long)]
    columns: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (logging is disabled without one)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load settings
    let settings = Settings::load(args.config.as_deref())?;

    init_logging(args.log_file.as_deref(), &settings.log_level)?;

    // Suppress all panic output in TUI mode
    std::panic::set_hook(Box::new(|_| {}));

    let theme = match settings.theme.as_str() {
        "light" => Theme::light(),
        _ => Theme::default(),
    };

    // Channel for fetch worker results
    let (message_tx, message_rx) = mpsc::channel(1000);
    let mut worker_handle = None;

    let (collection, columns, source_label) = match (&args.file, &args.database) {
        (Some(_), Some(_)) => bail!("--file and --database are mutually exclusive"),
        (None, None) => bail!("either --file or --database is required"),

        (Some(path), None) => {
            let records = models::load_records(path)?;
            let columns = match &args.columns {
                Some(spec) => grid::load_columns(spec)?,
                None => grid::derive_columns(&records),
            };
            let label = format!("file:{}", path.display());
            let collection = match args.page_size {
                Some(size) => Collection::new_client_paged(records, size),
                None => Collection::new_local(records),
            };
            (collection, columns, label)
        }

        (None, Some(database)) => {
            let Some(table) = args.table.as_deref() else {
                bail!("--table is required with --database");
            };
            let source = SqliteSource::open(database, table)?;
            let columns = match &args.columns {
                Some(spec) => grid::load_columns(spec)?,
                None => grid::columns_from_names(source.columns()),
            };
            let label = format!("sqlite:{}#{}", database, table);

            let (fetch_tx, fetch_rx) = mpsc::channel(100);
            let mut collection =
                Collection::new_remote(fetch_tx, args.page_size.unwrap_or(settings.page_size));

            // Start fetch worker, then request the first page
            worker_handle = Some(tokio::spawn(run_fetch_worker(
                source,
                fetch_rx,
                message_tx.clone(),
            )));
            collection.refresh();

            (collection, columns, label)
        }
    };
    drop(message_tx);

    let header = HeaderRow::new(columns, &collection)?;

    // Run TUI (blocks until user quits)
    let mut tui = TuiApp::new(
        collection,
        header,
        message_rx,
        theme,
        source_label,
        settings.mouse_capture,
    )?;
    let result = tui.run().await;

    // Cleanup
    if let Some(handle) = worker_handle {
        handle.abort();
    }

    result
}
