use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RemoteError;
use crate::lenient;

/// Body of a successful `POST /generate-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default, deserialize_with = "lenient::object")]
    pub download_info: Option<DownloadInfo>,
}

impl GenerationResponse {
    /// Parse a response body. Anything but a JSON object is malformed.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RemoteError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| RemoteError::Malformed(format!("invalid json: {err}")))?;
        if !value.is_object() {
            return Err(RemoteError::Malformed(
                "expected a json object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|err| RemoteError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadInfo {
    #[serde(deserialize_with = "lenient::boolean")]
    pub is_zip: bool,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub format: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub files: Vec<FileInfo>,
}

/// One generated table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub table_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub format: String,
    #[serde(deserialize_with = "lenient::string")]
    pub filename: String,
}

/// A link offered to the user after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub label: String,
    pub url: String,
    /// Name to save the file under, as chosen by the server.
    pub filename: String,
}

/// What a generation response amounts to. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// All tables packed into one archive.
    Archive(DownloadDescriptor),
    /// One file per table; never empty.
    Files(Vec<DownloadDescriptor>),
    /// The response was understood but lists nothing to download.
    NoArtifacts,
    /// The response carried no `download_info` at all.
    NoDownloadInfo,
}

impl DownloadOutcome {
    pub fn descriptors(&self) -> &[DownloadDescriptor] {
        match self {
            DownloadOutcome::Archive(descriptor) => std::slice::from_ref(descriptor),
            DownloadOutcome::Files(descriptors) => descriptors,
            DownloadOutcome::NoArtifacts | DownloadOutcome::NoDownloadInfo => &[],
        }
    }

    pub fn message(&self) -> String {
        match self {
            DownloadOutcome::Archive(_) => "Archive ready for download.".to_string(),
            DownloadOutcome::Files(files) => format!("{} file(s) ready for download.", files.len()),
            DownloadOutcome::NoArtifacts => {
                "No files were generated or the response was not recognized.".to_string()
            }
            DownloadOutcome::NoDownloadInfo => {
                "No download information was received from the server.".to_string()
            }
        }
    }
}

/// Normalize a generation response into download descriptors.
pub fn interpret_response(response: &GenerationResponse) -> DownloadOutcome {
    let Some(info) = &response.download_info else {
        return DownloadOutcome::NoDownloadInfo;
    };

    if info.is_zip {
        return match &info.url {
            Some(url) => DownloadOutcome::Archive(archive_descriptor(info, url)),
            None => DownloadOutcome::NoArtifacts,
        };
    }

    let files: Vec<DownloadDescriptor> = info
        .files
        .iter()
        .filter(|file| !file.url.trim().is_empty())
        .map(file_descriptor)
        .collect();

    if files.is_empty() {
        DownloadOutcome::NoArtifacts
    } else {
        DownloadOutcome::Files(files)
    }
}

fn archive_descriptor(info: &DownloadInfo, url: &str) -> DownloadDescriptor {
    let label = match &info.format {
        Some(format) => format!("Download all tables ({}) - ZIP", format.to_uppercase()),
        None => "Download all tables - ZIP".to_string(),
    };
    let filename = info
        .filename
        .clone()
        .unwrap_or_else(|| filename_from_url(url));
    DownloadDescriptor {
        label,
        url: url.to_string(),
        filename,
    }
}

fn file_descriptor(file: &FileInfo) -> DownloadDescriptor {
    let label = match (file.table_name.trim(), file.format.trim()) {
        ("", "") => format!("Download {}", filename_from_url(&file.url)),
        (table, "") => format!("Download {table}"),
        (table, format) => format!("Download {table}.{format}"),
    };
    let filename = if file.filename.trim().is_empty() {
        filename_from_url(&file.url)
    } else {
        file.filename.clone()
    };
    DownloadDescriptor {
        label,
        url: file.url.clone(),
        filename,
    }
}

fn filename_from_url(url: &str) -> String {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("download")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn interpret(value: serde_json::Value) -> DownloadOutcome {
        let bytes = serde_json::to_vec(&value).expect("encode");
        interpret_response(&GenerationResponse::from_slice(&bytes).expect("parse"))
    }

    #[test]
    fn archive_response_yields_single_descriptor() {
        let outcome = interpret(json!({
            "download_info": {"is_zip": true, "url": "/f/a.zip", "filename": "a.zip", "format": "csv"}
        }));
        let DownloadOutcome::Archive(descriptor) = &outcome else {
            panic!("expected archive, got {outcome:?}");
        };
        assert_eq!(descriptor.filename, "a.zip");
        assert_eq!(descriptor.url, "/f/a.zip");
        assert_eq!(descriptor.label, "Download all tables (CSV) - ZIP");
        assert_eq!(outcome.descriptors().len(), 1);
    }

    #[test]
    fn archive_wins_over_files() {
        let outcome = interpret(json!({
            "download_info": {
                "is_zip": true, "url": "/f/a.zip",
                "files": [{"url": "/f/u.csv", "table_name": "users", "format": "csv", "filename": "u.csv"}]
            }
        }));
        let DownloadOutcome::Archive(descriptor) = outcome else {
            panic!("expected archive");
        };
        assert_eq!(descriptor.filename, "a.zip");
        assert_eq!(descriptor.label, "Download all tables - ZIP");
    }

    #[test]
    fn file_list_yields_one_descriptor_per_file() {
        let outcome = interpret(json!({
            "download_info": {
                "is_zip": false,
                "files": [
                    {"url": "/download/users_1.csv", "table_name": "users", "format": "csv", "filename": "users_1.csv"},
                    {"url": "/download/orders_1.xlsx", "table_name": "orders", "format": "excel", "filename": ""}
                ]
            }
        }));
        let DownloadOutcome::Files(files) = outcome else {
            panic!("expected files");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].label, "Download users.csv");
        assert_eq!(files[0].filename, "users_1.csv");
        assert_eq!(files[1].label, "Download orders.excel");
        assert_eq!(files[1].filename, "orders_1.xlsx");
    }

    #[test]
    fn empty_file_list_is_no_artifacts() {
        assert_eq!(
            interpret(json!({"download_info": {"files": []}})),
            DownloadOutcome::NoArtifacts
        );
        assert_eq!(
            interpret(json!({"download_info": {"is_zip": true}})),
            DownloadOutcome::NoArtifacts
        );
        assert_eq!(
            interpret(json!({"download_info": {"files": [{"table_name": "x"}]}})),
            DownloadOutcome::NoArtifacts
        );
    }

    #[test]
    fn missing_download_info_is_distinct() {
        assert_eq!(interpret(json!({})), DownloadOutcome::NoDownloadInfo);
        assert_eq!(
            interpret(json!({"download_info": null})),
            DownloadOutcome::NoDownloadInfo
        );
        assert!(DownloadOutcome::NoDownloadInfo.descriptors().is_empty());
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            GenerationResponse::from_slice(b"[1,2]"),
            Err(RemoteError::Malformed(_))
        ));
        assert!(matches!(
            GenerationResponse::from_slice(b"<html>"),
            Err(RemoteError::Malformed(_))
        ));
    }

    #[test]
    fn filename_falls_back_to_url_segment() {
        assert_eq!(filename_from_url("/download/x.csv?sig=1"), "x.csv");
        assert_eq!(filename_from_url("/"), "download");
    }
}
