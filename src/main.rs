//! SQL Coach - a terminal client for the SQL learning service
//!
//! This is the binary entry point. All logic lives in the workspace crates.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use sqlcoach_app::config::{self, Settings};
use sqlcoach_app::{AppState, ContextStore, FileStore, SessionIdentity};
use sqlcoach_client::HttpBackend;
use sqlcoach_tui::Osc52Clipboard;
use tracing::{info, warn};

/// SQL Coach - practice SQL, browse the cheat sheet and chat with an assistant
#[derive(Parser, Debug)]
#[command(name = "sqlcoach")]
#[command(about = "A terminal client for the SQL learning service", long_about = None)]
struct Args {
    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long, env = "SQLCOACH_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Keep the session identity in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Discard the stored identity and start a new session
    #[arg(long)]
    reset_session: bool,

    /// Print the session description as JSON and exit
    #[arg(long)]
    print_session: bool,

    /// Print the code/prose segmentation of FILE as JSON and exit
    #[arg(long, value_name = "FILE")]
    segment: Option<PathBuf>,

    /// Write a default config.toml and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.segment {
        return headless::print_segments(path, &mut std::io::stdout().lock());
    }

    let config_dir = config::default_config_dir();

    if args.init_config {
        let dir = config_dir.ok_or_else(|| eyre!("No config directory on this platform"))?;
        let path = config::init_config_dir(&dir)?;
        println!("{}", path.display());
        return Ok(());
    }

    sqlcoach_core::logging::init()?;

    let mut settings = config_dir
        .as_deref()
        .map(config::load_settings)
        .unwrap_or_else(Settings::default);
    if let Some(url) = args.api_url {
        settings.api.base_url = url;
    }

    let identity = match config::default_data_dir() {
        Some(dir) if !args.ephemeral => SessionIdentity::new(Box::new(FileStore::in_dir(&dir))),
        Some(_) => SessionIdentity::ephemeral(),
        None => {
            warn!("No data directory on this platform, session will not persist");
            SessionIdentity::ephemeral()
        }
    };
    if args.reset_session {
        let id = identity.regenerate();
        info!(user_id = %id, "Session reset");
    }

    if args.print_session {
        return headless::print_session(&identity.session_info(), &mut std::io::stdout().lock());
    }

    let user_id = identity.get_id();
    let backend = HttpBackend::new(&settings.api.base_url, settings.api.timeout())?;
    let state = AppState::new(settings, user_id, ContextStore::new());

    sqlcoach_tui::run(backend, state, Box::new(Osc52Clipboard)).await?;
    Ok(())
}
