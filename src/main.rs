mod audio;
mod catalog;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use catalog::CatalogClient;
use config::Config;
use controller::AppController;
use model::AppModel;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_warnings) = Config::from_env();

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== tunes-rs starting ===");
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(catalog_url = %config.catalog_url, timeout = ?config.request_timeout, "Configuration loaded");

    let catalog = CatalogClient::new(&config)?;
    let model = Arc::new(Mutex::new(AppModel::new()));
    let audio_backend: Arc<Mutex<Option<AudioBackend>>> = Arc::new(Mutex::new(None));
    let controller = AppController::new(model.clone(), audio_backend.clone(), catalog);

    // Open the output device before the catalog arrives so the first song
    // can be preloaded; without a device the player still runs, silently.
    match tokio::task::spawn_blocking(AudioBackend::new).await? {
        Ok((backend, events)) => {
            *audio_backend.lock().await = Some(backend);
            controller.start_audio_event_listener(events);
        }
        Err(e) => tracing::warn!(error = %e, "Running without audio output"),
    }

    // One-shot catalog fetch; the list renders empty until it lands
    let controller_for_catalog = controller.clone();
    tokio::spawn(async move {
        controller_for_catalog.load_catalog().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    // Dropping the backend stops the output thread
    audio_backend.lock().await.take();

    tracing::info!("tunes-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (playback, ui_state, should_quit) = {
            let model_guard = model.lock().await;

            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info().await,
                model_guard.get_ui_state().await,
                model_guard.should_quit().await,
            )
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state);
        })?;

        // Short poll keeps the progress bar moving
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
