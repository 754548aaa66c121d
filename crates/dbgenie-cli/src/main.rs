mod logging;
mod run;
mod tui;
mod workspace;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dbgenie_client::{ClientError, HttpGenerationService, SessionCallError};
use dbgenie_core::{Error as CoreError, RemoteError};
use thiserror::Error;

use workspace::{
    SERVER_URL_ENV, WorkspaceError, WorkspacePaths, load_or_create_settings, new_session_id,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Call(#[from] SessionCallError),
    #[error("{0}")]
    Remote(#[from] RemoteError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "dbgenie",
    version,
    about = "Describe tables, let the generation service fill them with data"
)]
struct Cli {
    /// Workspace directory for settings, drafts, downloads and logs.
    #[arg(long, global = true, default_value = ".dbgenie")]
    workspace: PathBuf,
    /// Generation service base url (overrides settings and $DBGENIE_SERVER_URL).
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive schema editor (default).
    Tui,
    /// Ask the service to propose tables for a description.
    Suggest(SuggestArgs),
    /// Submit a schema draft and collect the download links.
    Generate(GenerateArgs),
    /// Print the JSON Schema of the generation request body.
    Schema,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// What the database is about.
    #[arg(long)]
    pub context: String,
    /// Save the proposal as a draft instead of printing it.
    #[arg(long, value_name = "FILE")]
    pub out: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Draft file in `{"tables": [...]}` form.
    #[arg(long, value_name = "FILE")]
    pub schema: String,
    /// Rows per table; anything that is not a positive number means 10.
    #[arg(long)]
    pub rows: Option<String>,
    /// csv or excel.
    #[arg(long)]
    pub format: Option<String>,
    #[arg(long)]
    pub context: Option<String>,
    /// Fetch every offered artifact into the downloads directory.
    #[arg(long, default_value_t = false)]
    pub download: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let command = match cli.command.unwrap_or(Command::Tui) {
        Command::Schema => return run::print_request_schema(),
        other => other,
    };

    let paths = WorkspacePaths::new(cli.workspace);
    paths.ensure_dirs()?;
    let settings = load_or_create_settings(&paths)?
        .with_overrides(std::env::var(SERVER_URL_ENV).ok(), cli.server);
    logging::init_logging(&paths.log_path())?;

    let kind = match &command {
        Command::Tui => "tui",
        Command::Suggest(_) => "suggest",
        Command::Generate(_) => "generate",
        Command::Schema => "schema",
    };
    let session_id = new_session_id(kind);
    tracing::info!(
        event = "session_started",
        session_id = %session_id,
        server = %settings.server_url,
        timeout_secs = settings.request_timeout_secs
    );

    let service = HttpGenerationService::with_timeout(
        &settings.server_url,
        settings.request_timeout(),
    )?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = match command {
        Command::Tui => tui::run(runtime.handle().clone(), paths, settings, service),
        Command::Suggest(args) => runtime.block_on(run::suggest(&paths, &service, args)),
        Command::Generate(args) => {
            runtime.block_on(run::generate(&paths, &settings, &service, args))
        }
        Command::Schema => run::print_request_schema(),
    };

    match &result {
        Ok(()) => tracing::info!(event = "session_finished", session_id = %session_id, status = "success"),
        Err(err) => tracing::error!(
            event = "session_finished",
            session_id = %session_id,
            status = "error",
            error = %err
        ),
    }
    result
}
