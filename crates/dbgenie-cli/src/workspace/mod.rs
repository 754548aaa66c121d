mod drafts;
mod files;
mod ids;
mod paths;
mod settings;

pub use drafts::{load_draft_into, save_draft};
pub use files::{save_download, write_bytes_atomic};
pub use ids::new_session_id;
pub use paths::WorkspacePaths;
pub use settings::{SERVER_URL_ENV, Settings, load_or_create_settings};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid workspace state: {0}")]
    Invalid(String),
    #[error("draft {}: {source}", path.display())]
    Draft {
        path: PathBuf,
        source: dbgenie_core::Error,
    },
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
