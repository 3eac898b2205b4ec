mod app;
mod cli;
mod config;
mod event;
mod git;
mod logging;
mod model;
mod sync;
mod tracker;
mod ui;
mod workflow;

use std::io;
use std::panic;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, Notify};

use app::{Action, App};
use sync::signal::{ChangeSource, IDLE_TIMEOUT};
use sync::Synchronizer;
use tracker::pivotal::PivotalClient;
use tracker::TrackerApi;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {}
        Some("help" | "--help" | "-h") => {
            cli::print_help();
            return Ok(());
        }
        Some("init") => return cli::handle_init(&args[1..]),
        Some("projects") => return cli::handle_projects().await,
        Some("use") => return cli::handle_use(&args[1..]).await,
        Some(other) => bail!("Unknown command: {other}\n\nRun `story help` for usage."),
    }

    logging::init()?;

    // Load config and the project mapped to this directory
    let config = config::load_config()?;
    let token = config
        .api_token()
        .context("No tracker token. Run `story init --token <token>` first")?;
    let project_dir = config::current_project_dir();
    let mappings = config::load_project_mappings()?;
    let Some(mapping) = mappings.get(&project_dir) else {
        bail!("No project for {project_dir}. Run `story projects` then `story use <project-id>`.");
    };
    tracing::info!(project = mapping.project_id, dir = %project_dir, "starting");

    let api: Arc<dyn TrackerApi> = Arc::new(PivotalClient::new(token, config.api_base()));
    let mut synchronizer = Synchronizer::new(git::HEAD_PATH, mapping.project_id, api.clone());
    let mut source = ChangeSource::new(git::HEAD_PATH, IDLE_TIMEOUT);

    // Set up action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let quit = Arc::new(Notify::new());

    let mut app = App::new(api, mapping.project_id, source.trigger(), action_tx.clone());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Spawn event reader
    let event_quit = quit.clone();
    tokio::spawn(async move {
        event::run_event_loop(action_tx, event_quit).await;
    });

    let result = sync::run(
        &mut terminal,
        &mut app,
        &mut synchronizer,
        &mut source,
        &mut action_rx,
        quit,
    )
    .await;

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting");
    }
    result
}
