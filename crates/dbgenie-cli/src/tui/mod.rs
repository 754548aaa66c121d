pub mod commands;
pub mod events;
pub mod state;
pub mod ui;
pub mod utils;

use std::io;
use std::time::Duration;

use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dbgenie_client::HttpGenerationService;
use dbgenie_core::SuggestionOutcome;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::CliError;
use crate::workspace::{Settings, WorkspacePaths};
use commands::{push_downloads, push_schema_summary};
use events::handle_key;
use state::{App, AppEvent};
use ui::draw_ui;

pub fn run(
    runtime: tokio::runtime::Handle,
    paths: WorkspacePaths,
    settings: Settings,
    service: HttpGenerationService,
) -> Result<(), CliError> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(runtime, paths, settings, service, tx);
    app.push_message("Describe your database, then /suggest or edit tables by hand.");
    app.push_message("Type /help to see commands.");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), CliError> {
    while !app.should_quit {
        terminal.draw(|frame| draw_ui(frame, app))?;

        while let Ok(event) = rx.try_recv() {
            handle_app_event(app, event);
        }

        app.spinner_idx = app.spinner_idx.wrapping_add(1);

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                event::Event::Key(key) => handle_key(app, key)?,
                event::Event::Mouse(mouse) => match mouse.kind {
                    event::MouseEventKind::ScrollDown => {
                        app.scroll_offset = app.scroll_offset.saturating_sub(1);
                    }
                    event::MouseEventKind::ScrollUp => {
                        app.scroll_offset = app.scroll_offset.saturating_add(1);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
    Ok(())
}

/// Fold a finished background request back into the session.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::SuggestionDone(result) => {
            let outcome = app.session.finish_suggestion(result);
            app.push_status();
            match outcome {
                Ok(SuggestionOutcome::Applied { tables }) => {
                    tracing::info!(event = "suggestion_applied", tables);
                    push_schema_summary(app);
                }
                Ok(SuggestionOutcome::NoSuggestions) => {
                    tracing::warn!(event = "suggestion_empty");
                }
                Err(err) => tracing::warn!(event = "suggestion_failed", error = %err),
            }
        }
        AppEvent::GenerationDone(result) => {
            match app.session.finish_generation(result).map(|_| ()) {
                Ok(()) => push_downloads(app),
                Err(err) => {
                    tracing::warn!(event = "generation_failed", error = %err);
                    app.push_status();
                }
            }
        }
        AppEvent::DownloadDone(result) => {
            app.downloads_pending = app.downloads_pending.saturating_sub(1);
            match result {
                Ok(path) => app.push_message(format!("saved {}", path.display())),
                Err(err) => {
                    tracing::warn!(event = "download_failed", error = %err);
                    app.push_message(format!("download failed: {err}"));
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use dbgenie_client::HttpGenerationService;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    use super::state::{App, AppEvent};
    use crate::workspace::{Settings, WorkspacePaths};

    pub fn test_app(
        server: &str,
    ) -> (
        tempfile::TempDir,
        tokio::runtime::Runtime,
        App,
        UnboundedReceiver<AppEvent>,
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let paths = WorkspacePaths::new(dir.path().join("ws"));
        paths.ensure_dirs().expect("dirs");
        let service = HttpGenerationService::new(server).expect("service");
        let (tx, rx) = unbounded_channel();
        let app = App::new(
            runtime.handle().clone(),
            paths,
            Settings::default(),
            service,
            tx,
        );
        (dir, runtime, app, rx)
    }
}
