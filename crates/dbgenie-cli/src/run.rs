//! Non-interactive subcommands.

use std::path::{Path, PathBuf};

use dbgenie_client::{GenerationService, HttpGenerationService, run_generation, run_suggestion};
use dbgenie_core::{
    DownloadDescriptor, OutputFormat, Session, SuggestionOutcome, SuggestionPayload,
    request_json_schema,
};

use crate::workspace::{
    Settings, WorkspacePaths, load_draft_into, save_download, write_bytes_atomic,
};
use crate::{CliError, GenerateArgs, SuggestArgs};

pub fn print_request_schema() -> Result<(), CliError> {
    let schema = request_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Print the proposed tables as a draft, or save them when `--out` is given.
pub async fn suggest<S>(paths: &WorkspacePaths, service: &S, args: SuggestArgs) -> Result<(), CliError>
where
    S: GenerationService + ?Sized,
{
    let mut session = Session::new();
    session.state_mut().set_database_context(args.context);

    let outcome = run_suggestion(&mut session, service).await?;
    eprintln!("{}", outcome.message());
    if outcome == SuggestionOutcome::NoSuggestions {
        return Ok(());
    }

    let draft = SuggestionPayload::from_state(session.state()).to_json_pretty()?;
    match args.out {
        Some(name) => {
            let path = paths.draft_path(&name);
            write_bytes_atomic(&path, draft.as_bytes())?;
            tracing::info!(event = "draft_saved", path = %path.display());
            eprintln!("draft saved to {}", path.display());
        }
        None => println!("{draft}"),
    }
    Ok(())
}

pub async fn generate(
    paths: &WorkspacePaths,
    settings: &Settings,
    service: &HttpGenerationService,
    args: GenerateArgs,
) -> Result<(), CliError> {
    let mut session = Session::new();
    let state = session.state_mut();
    load_draft_into(&paths.draft_path(&args.schema), state)?;
    state.set_num_rows_input(
        &args
            .rows
            .unwrap_or_else(|| settings.default_rows.to_string()),
    );
    state.requested_format = match args.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => settings.default_format,
    };
    if let Some(context) = args.context {
        state.set_database_context(context);
    }

    let outcome = run_generation(&mut session, service).await?;
    eprintln!("{}", outcome.message());
    for descriptor in outcome.descriptors() {
        let url = service.resolve(&descriptor.url)?;
        println!("{}\t{}", descriptor.label, url);
    }

    if args.download {
        for descriptor in outcome.descriptors() {
            let path = fetch_artifact(service, &paths.downloads_dir, descriptor).await?;
            println!("saved {}", path.display());
        }
    }
    Ok(())
}

/// Download one artifact into `dir` under its server-chosen name.
pub async fn fetch_artifact<S>(
    service: &S,
    dir: &Path,
    descriptor: &DownloadDescriptor,
) -> Result<PathBuf, CliError>
where
    S: GenerationService + ?Sized,
{
    let bytes = service.download(&descriptor.url).await?;
    let path = save_download(dir, &descriptor.filename, &bytes)?;
    tracing::info!(
        event = "artifact_saved",
        path = %path.display(),
        bytes = bytes.len()
    );
    Ok(path)
}
