use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::column::{ColumnKind, ColumnSpec};
use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::naming::PlaceholderNames;
use crate::state::SchemaState;

/// Body of `POST /generate-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    /// Tables to generate, in the order the user defined them.
    pub tables: Vec<TableRequest>,
    #[schemars(range(min = 1))]
    pub num_rows: u32,
    pub database_context: String,
    pub requested_format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableRequest {
    pub name: String,
    pub columns: Vec<ColumnRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    pub options: String,
    pub unique: bool,
    pub nullable: bool,
    /// Always 0 when `nullable` is false.
    pub nullable_chance: u8,
}

/// Build the generation request for `state` in the chosen `format`.
pub fn build_request(state: &SchemaState, format: OutputFormat) -> Result<GenerationRequest> {
    build_request_with(state, format, &mut PlaceholderNames::new())
}

/// Same as [`build_request`] with a caller-provided name generator.
///
/// Blank names are replaced with placeholders and tables without columns are
/// dropped. Fails with [`Error::EmptySchema`] when nothing is left.
pub fn build_request_with(
    state: &SchemaState,
    format: OutputFormat,
    names: &mut PlaceholderNames,
) -> Result<GenerationRequest> {
    let mut tables = Vec::with_capacity(state.tables().len());

    for table in state.tables() {
        let name = non_blank(&table.name).unwrap_or_else(|| names.table());
        let columns: Vec<ColumnRequest> = table
            .columns
            .iter()
            .map(|column| column_request(column, names))
            .collect();
        if columns.is_empty() {
            continue;
        }
        tables.push(TableRequest { name, columns });
    }

    if tables.is_empty() {
        return Err(Error::EmptySchema);
    }

    Ok(GenerationRequest {
        tables,
        num_rows: state.num_rows.max(1),
        database_context: state.effective_context().to_string(),
        requested_format: format,
    })
}

/// JSON Schema of [`GenerationRequest`], for contract checks on the backend.
pub fn request_json_schema() -> RootSchema {
    schemars::schema_for!(GenerationRequest)
}

fn column_request(column: &ColumnSpec, names: &mut PlaceholderNames) -> ColumnRequest {
    ColumnRequest {
        name: non_blank(&column.name).unwrap_or_else(|| names.column()),
        kind: column.kind.clone(),
        options: column.options.trim().to_string(),
        unique: column.unique,
        nullable: column.nullable,
        nullable_chance: column.effective_nullable_chance(),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
