use std::path::Path;

use dbgenie_core::{SchemaState, SuggestionPayload, apply_suggestion};

use super::files::write_bytes_atomic;
use super::{WorkspaceError, WorkspaceResult};

/// Save the table list in the same `{"tables": [...]}` shape the service
/// suggests, so a draft can be edited by hand or produced by `suggest --out`.
pub fn save_draft(path: &Path, state: &SchemaState) -> WorkspaceResult<usize> {
    let payload = SuggestionPayload::from_state(state);
    let encoded = payload
        .to_json_pretty()
        .map_err(|err| WorkspaceError::Invalid(err.to_string()))?;
    write_bytes_atomic(path, encoded.as_bytes())?;
    Ok(payload.tables.len())
}

/// Replace the tables of `state` with the draft at `path`. Row count, context
/// and format are left alone.
pub fn load_draft_into(path: &Path, state: &mut SchemaState) -> WorkspaceResult<usize> {
    let bytes = std::fs::read(path)?;
    let payload = SuggestionPayload::from_draft(&bytes).map_err(|source| WorkspaceError::Draft {
        path: path.to_path_buf(),
        source,
    })?;
    let count = payload.tables.len();
    apply_suggestion(state, Some(payload));
    Ok(count)
}
