use std::path::{Path, PathBuf};

use super::{WorkspaceError, WorkspaceResult};

#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub drafts_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf) -> Self {
        let config_dir = root.join("config");
        let drafts_dir = root.join("drafts");
        let downloads_dir = root.join("downloads");
        let logs_dir = root.join("logs");
        Self {
            root,
            config_dir,
            drafts_dir,
            downloads_dir,
            logs_dir,
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Structured tracing output.
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir.join("dbgenie.ndjson")
    }

    /// Plain transcript of the interactive session.
    pub fn cli_log_path(&self) -> PathBuf {
        self.logs_dir.join("cli.log")
    }

    /// Where a draft named on the command line lives. Bare names go to the
    /// drafts directory and get a `.json` extension; anything with a
    /// directory component is used as given.
    pub fn draft_path(&self, name: &str) -> PathBuf {
        let candidate = Path::new(name);
        if candidate.components().count() > 1 || candidate.is_absolute() {
            return candidate.to_path_buf();
        }
        let mut path = self.drafts_dir.join(candidate);
        if path.extension().is_none() {
            path.set_extension("json");
        }
        path
    }

    pub fn ensure_dirs(&self) -> WorkspaceResult<()> {
        for dir in [
            &self.root,
            &self.config_dir,
            &self.drafts_dir,
            &self.downloads_dir,
            &self.logs_dir,
        ] {
            create_if_missing(dir)?;
        }
        Ok(())
    }
}

fn create_if_missing(path: &Path) -> WorkspaceResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(WorkspaceError::from)
}
