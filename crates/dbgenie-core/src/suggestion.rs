use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::lenient;
use crate::state::SchemaState;
use crate::table::TableSpec;

/// Body of `POST /suggest-schema-ai`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub context: String,
}

/// A set of table definitions: either an AI suggestion or a saved draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionPayload {
    #[serde(deserialize_with = "lenient::list")]
    pub tables: Vec<TableSpec>,
}

impl SuggestionPayload {
    /// Read a payload from any JSON value. Values without a usable `tables`
    /// array give an empty payload rather than an error.
    pub fn from_value(value: Value) -> Self {
        lenient::object_as(value).unwrap_or_default()
    }

    /// Parse a payload from raw bytes; only invalid JSON is an error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(value))
    }

    /// Parse a saved draft. Unlike a suggestion, a draft with no usable tables
    /// is rejected.
    pub fn from_draft(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| Error::InvalidPayload(err.to_string()))?;
        let payload = Self::from_value(value);
        if payload.is_empty() {
            return Err(Error::InvalidPayload("draft has no tables".to_string()));
        }
        Ok(payload)
    }

    /// Snapshot the current table list, e.g. to save it as a draft.
    pub fn from_state(state: &SchemaState) -> Self {
        Self {
            tables: state.tables().to_vec(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Result of replacing the table list with a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Applied { tables: usize },
    /// Nothing usable came back; the state holds a single default table.
    NoSuggestions,
}

impl SuggestionOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SuggestionOutcome::Applied { .. } => {
                "Schema suggestions loaded successfully! Please review and adjust."
            }
            SuggestionOutcome::NoSuggestions => {
                "AI did not provide valid schema suggestions. Please try again."
            }
        }
    }
}

/// Replace every table in `state` with the suggested ones.
///
/// Prior edits are discarded unconditionally. Generation parameters (row
/// count, context, format) are kept.
pub fn apply_suggestion(
    state: &mut SchemaState,
    payload: Option<SuggestionPayload>,
) -> SuggestionOutcome {
    state.clear_tables();

    match payload.filter(|payload| !payload.is_empty()) {
        Some(payload) => {
            let count = payload.tables.len();
            for table in payload.tables {
                state.add_table(Some(table.name), table.columns);
            }
            SuggestionOutcome::Applied { tables: count }
        }
        None => {
            state.ensure_non_empty();
            SuggestionOutcome::NoSuggestions
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::column::ColumnKind;

    #[test]
    fn drafts_need_tables_and_valid_json() {
        let draft = SuggestionPayload::from_draft(br#"{"tables":[{"name":"a","columns":[]}]}"#)
            .expect("draft");
        assert_eq!(draft.tables.len(), 1);
        assert!(matches!(
            SuggestionPayload::from_draft(br#"{"tables": []}"#),
            Err(Error::InvalidPayload(message)) if message == "draft has no tables"
        ));
        assert!(matches!(
            SuggestionPayload::from_draft(b"{tables"),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn replaces_prior_tables() {
        let mut state = SchemaState::new();
        state.add_table(Some("legacy".into()), Vec::new());
        state.set_num_rows_input("40");

        let payload = SuggestionPayload::from_value(json!({
            "tables": [{"name": "users", "columns": [{"name": "id", "type": "integer"}]}]
        }));
        let outcome = apply_suggestion(&mut state, Some(payload));

        assert_eq!(outcome, SuggestionOutcome::Applied { tables: 1 });
        assert_eq!(state.tables().len(), 1);
        let table = &state.tables()[0];
        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].kind, ColumnKind::Integer);
        assert_eq!(state.num_rows, 40);
    }

    #[test]
    fn suggested_table_without_columns_is_seeded() {
        let mut state = SchemaState::new();
        let payload = SuggestionPayload::from_value(json!({"tables": [{"name": "tags"}]}));
        apply_suggestion(&mut state, Some(payload));
        assert_eq!(state.tables()[0].columns.len(), 1);
    }

    #[test]
    fn empty_or_missing_payload_resets_to_default() {
        for payload in [
            None,
            Some(SuggestionPayload::default()),
            Some(SuggestionPayload::from_value(json!({"tables": "nope"}))),
            Some(SuggestionPayload::from_value(json!(["not", "an", "object"]))),
        ] {
            let mut state = SchemaState::new();
            state.add_table(Some("kept?".into()), Vec::new());
            let outcome = apply_suggestion(&mut state, payload);
            assert_eq!(outcome, SuggestionOutcome::NoSuggestions);
            assert_eq!(state.tables().len(), 1);
            assert_eq!(state.tables()[0].name, "Table1");
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(SuggestionPayload::from_slice(b"{not json").is_err());
        let payload = SuggestionPayload::from_slice(br#"{"error": "x"}"#).expect("parse");
        assert!(payload.is_empty());
    }

    #[test]
    fn draft_round_trips_through_state() {
        let mut state = SchemaState::new();
        state.add_table(Some("orders".into()), Vec::new());
        let draft = SuggestionPayload::from_state(&state);
        let json = draft.to_json_pretty().expect("encode");

        let mut restored = SchemaState::new();
        apply_suggestion(
            &mut restored,
            Some(SuggestionPayload::from_slice(json.as_bytes()).expect("decode")),
        );
        assert_eq!(restored.tables(), state.tables());
    }
}
