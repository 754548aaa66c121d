use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{WorkspaceError, WorkspaceResult};

/// Write via a sibling temp file and rename, so readers never see a partial
/// file.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> WorkspaceResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }
    Ok(())
}

/// Save a downloaded artifact under `dir` using the server-chosen filename.
pub fn save_download(dir: &Path, filename: &str, data: &[u8]) -> WorkspaceResult<PathBuf> {
    let path = dir.join(checked_filename(filename)?);
    write_bytes_atomic(&path, data)?;
    Ok(path)
}

/// Accept only a plain file name: no separators, no `..`, nothing hidden.
pub fn checked_filename(filename: &str) -> WorkspaceResult<&str> {
    let name = filename.trim();
    let invalid = name.is_empty()
        || name.contains("..")
        || name.contains(['/', '\\'])
        || name.starts_with('.');
    if invalid {
        return Err(WorkspaceError::Invalid(format!(
            "refusing to save download as {filename:?}"
        )));
    }
    Ok(name)
}

fn temp_path(path: &Path) -> WorkspaceResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| WorkspaceError::Invalid("invalid path for atomic write".to_string()))?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}
