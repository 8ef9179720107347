use std::{path::PathBuf, rc::Rc, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;
use library_core::Route;
use shared::domain::Locale;
use storage::JsonFileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod host;
mod shell;
mod ui;

use backend_bridge::{
    commands::AvatarReader,
    runtime::{build_runtime, TokioAvatarReader},
};
use config::load_settings;
use controller::UiEvent;
use host::Host;
use shell::spawn_stdin_reader;

#[derive(Parser, Debug)]
#[command(about = "Borrowed-books catalog driven from the terminal")]
struct Cli {
    /// Page to open first: login, index or profile.
    #[arg(long, default_value = "index")]
    page: String,
    /// Directory holding the persisted session store.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    locale: Option<Locale>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }
    if let Some(locale) = cli.locale {
        settings.locale = locale;
    }
    let route =
        Route::from_name(&cli.page).with_context(|| format!("unknown page '{}'", cli.page))?;

    let store_path = settings.store_path();
    let store = Arc::new(JsonFileStore::open(&store_path).with_context(|| {
        format!("failed to open session store '{}'", store_path.display())
    })?);
    info!(store = %store_path.display(), locale = ?settings.locale, "catalog shell starting");

    let runtime = build_runtime()?;
    let (avatar_tx, avatar_rx) = unbounded::<UiEvent>();
    let avatar_reader: Rc<dyn AvatarReader> =
        Rc::new(TokioAvatarReader::new(runtime.handle().clone(), avatar_tx));
    let lines = spawn_stdin_reader();

    println!("type help for commands");
    Host::new(settings, store, avatar_reader, lines, avatar_rx).run(route)?;

    runtime.shutdown_background();
    info!("catalog shell stopped");
    Ok(())
}
