//! Controller that owns the schema state for one editing session.
//!
//! Network calls are split into `begin_*` / `finish_*` pairs so the caller can
//! run the request however it likes (await it inline, or spawn it and report
//! back through a channel). Between the two calls the action is marked in
//! flight and a second `begin_*` for it is refused.

use std::fmt;

use crate::error::{Error, RemoteError, Result};
use crate::request::{GenerationRequest, build_request};
use crate::response::{DownloadOutcome, GenerationResponse, interpret_response};
use crate::state::SchemaState;
use crate::suggestion::{SuggestionOutcome, SuggestionPayload, SuggestionRequest, apply_suggestion};

/// A user action backed by a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Suggest,
    Generate,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Suggest => "suggestion",
            Action::Generate => "generation",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    suggest: bool,
    generate: bool,
}

impl InFlight {
    fn slot(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Suggest => &mut self.suggest,
            Action::Generate => &mut self.generate,
        }
    }

    fn get(self, action: Action) -> bool {
        match action {
            Action::Suggest => self.suggest,
            Action::Generate => self.generate,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: SchemaState,
    in_flight: InFlight,
    status: Option<String>,
    downloads: Option<DownloadOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SchemaState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SchemaState {
        &self.state
    }

    /// Direct access for user edits. Structural edits go through the
    /// `SchemaState` methods, which keep the table list non-empty.
    pub fn state_mut(&mut self) -> &mut SchemaState {
        &mut self.state
    }

    pub fn is_pending(&self, action: Action) -> bool {
        self.in_flight.get(action)
    }

    /// Latest user-facing status line.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Result of the last completed generation, if any.
    pub fn downloads(&self) -> Option<&DownloadOutcome> {
        self.downloads.as_ref()
    }

    /// Start a suggestion request using the current database context.
    pub fn begin_suggestion(&mut self) -> Result<SuggestionRequest> {
        let context = self.state.database_context.trim().to_string();
        if context.is_empty() {
            return Err(Error::EmptyContext);
        }
        self.acquire(Action::Suggest)?;
        self.downloads = None;
        self.status = Some("AI is thinking for schema suggestions...".to_string());
        Ok(SuggestionRequest { context })
    }

    /// Complete a suggestion request.
    ///
    /// A payload replaces every table. A failure leaves the tables as they
    /// were; either way the table list is non-empty afterwards.
    pub fn finish_suggestion(
        &mut self,
        result: std::result::Result<SuggestionPayload, RemoteError>,
    ) -> std::result::Result<SuggestionOutcome, RemoteError> {
        self.release(Action::Suggest);
        match result {
            Ok(payload) => {
                let outcome = apply_suggestion(&mut self.state, Some(payload));
                self.status = Some(outcome.message().to_string());
                Ok(outcome)
            }
            Err(err) => {
                self.state.ensure_non_empty();
                self.status = Some(format!("Schema suggestion failed: {err}"));
                Err(err)
            }
        }
    }

    /// Build the generation request and mark generation in flight.
    ///
    /// Fails without touching the in-flight flag when there is nothing to
    /// submit.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest> {
        if self.is_pending(Action::Generate) {
            return Err(Error::Busy(Action::Generate));
        }
        let format = self.state.requested_format;
        let request = match build_request(&self.state, format) {
            Ok(request) => request,
            Err(err) => {
                self.status = Some(err.to_string());
                return Err(err);
            }
        };
        self.acquire(Action::Generate)?;
        self.downloads = None;
        self.status = Some(format!(
            "Processing data (format: {})...",
            format.as_str().to_uppercase()
        ));
        Ok(request)
    }

    /// Complete a generation request and keep its interpreted outcome.
    pub fn finish_generation(
        &mut self,
        result: std::result::Result<GenerationResponse, RemoteError>,
    ) -> std::result::Result<&DownloadOutcome, RemoteError> {
        self.release(Action::Generate);
        self.state.ensure_non_empty();
        match result {
            Ok(response) => {
                let outcome = interpret_response(&response);
                self.status = Some(outcome.message());
                let outcome = self.downloads.insert(outcome);
                Ok(&*outcome)
            }
            Err(err) => {
                self.status = Some(format!("Data generation failed: {err}"));
                Err(err)
            }
        }
    }

    fn acquire(&mut self, action: Action) -> Result<()> {
        let slot = self.in_flight.slot(action);
        if *slot {
            return Err(Error::Busy(action));
        }
        *slot = true;
        Ok(())
    }

    fn release(&mut self, action: Action) {
        *self.in_flight.slot(action) = false;
    }
}
