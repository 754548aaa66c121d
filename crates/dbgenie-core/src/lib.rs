//! Schema-definition model for dbgenie.
//!
//! Holds the tables and columns a user describes, turns them into a single
//! generation request, folds AI suggestions back in, and normalizes the
//! service's download response. Nothing here performs I/O.

pub mod column;
pub mod error;
pub mod format;
mod lenient;
pub mod naming;
pub mod request;
pub mod response;
pub mod session;
pub mod state;
pub mod suggestion;
pub mod table;

pub use column::{ColumnKind, ColumnSpec, DEFAULT_NULLABLE_CHANCE, OptionsHint, options_hint};
pub use error::{Error, RemoteError, Result};
pub use format::OutputFormat;
pub use naming::PlaceholderNames;
pub use request::{
    ColumnRequest, GenerationRequest, TableRequest, build_request, build_request_with,
    request_json_schema,
};
pub use response::{
    DownloadDescriptor, DownloadInfo, DownloadOutcome, FileInfo, GenerationResponse,
    interpret_response,
};
pub use session::{Action, Session};
pub use state::{DEFAULT_DATABASE_CONTEXT, DEFAULT_NUM_ROWS, SchemaState, parse_num_rows};
pub use suggestion::{SuggestionOutcome, SuggestionPayload, SuggestionRequest, apply_suggestion};
pub use table::TableSpec;
