use std::path::PathBuf;
use std::sync::Arc;

use dbgenie_client::HttpGenerationService;
use dbgenie_core::{
    Action, GenerationResponse, RemoteError, SchemaState, Session, SuggestionPayload,
};

use crate::tui::utils::append_line;
use crate::workspace::{Settings, WorkspacePaths};

pub const MAX_MESSAGES: usize = 1000;

#[derive(Debug, Clone)]
pub struct PaletteEntry {
    pub command: &'static str,
    pub description: &'static str,
}

/// Results of background requests, delivered back to the UI loop.
pub enum AppEvent {
    SuggestionDone(Result<SuggestionPayload, RemoteError>),
    GenerationDone(Result<GenerationResponse, RemoteError>),
    DownloadDone(Result<PathBuf, String>),
}

pub struct App {
    pub runtime: tokio::runtime::Handle,
    pub tx: tokio::sync::mpsc::UnboundedSender<AppEvent>,
    pub paths: WorkspacePaths,
    pub settings: Settings,
    pub service: Arc<HttpGenerationService>,
    pub session: Session,
    pub input: String,
    pub messages: Vec<String>,
    pub should_quit: bool,
    pub scroll_offset: u16,
    pub palette_select: usize,
    pub spinner_idx: usize,
    pub downloads_pending: usize,
}

impl App {
    pub fn new(
        runtime: tokio::runtime::Handle,
        paths: WorkspacePaths,
        settings: Settings,
        service: HttpGenerationService,
        tx: tokio::sync::mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let mut state = SchemaState::new();
        state.set_num_rows_input(&settings.default_rows.to_string());
        state.requested_format = settings.default_format;

        Self {
            runtime,
            tx,
            paths,
            settings,
            service: Arc::new(service),
            session: Session::with_state(state),
            input: String::new(),
            messages: Vec::new(),
            should_quit: false,
            scroll_offset: 0,
            palette_select: 0,
            spinner_idx: 0,
            downloads_pending: 0,
        }
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        let line = message.into();
        self.messages.push(line.clone());
        let _ = append_line(&self.paths.cli_log_path(), &line);
        if self.messages.len() > MAX_MESSAGES {
            let overflow = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(0..overflow);
        }
    }

    pub fn record_command(&mut self, command: &str) {
        if !self.messages.is_empty() {
            self.push_message("");
        }
        self.push_message(format!("► {}", command));
    }

    /// Echo the session status line into the message log.
    pub fn push_status(&mut self) {
        if let Some(status) = self.session.status().map(str::to_string) {
            self.push_message(status);
        }
    }

    /// Label for the spinner while something is running in the background.
    pub fn busy_label(&self) -> Option<String> {
        if self.session.is_pending(Action::Suggest) {
            Some("asking for schema suggestions".to_string())
        } else if self.session.is_pending(Action::Generate) {
            Some(format!(
                "generating data ({})",
                self.session.state().requested_format
            ))
        } else if self.downloads_pending > 0 {
            Some(format!("downloading {} file(s)", self.downloads_pending))
        } else {
            None
        }
    }
}
