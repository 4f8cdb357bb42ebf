use crate::config::StorageConfig;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes uploads into the publicly served directory.
///
/// Files are named `<prefix>_<YYYYMMDD_HHMMSS>.<ext>` from local time, so two
/// uploads with the same extension in the same second share a name and the
/// later one replaces the earlier. Nothing is ever removed.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
    filename_prefix: String,
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
}

impl UploadStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.static_dir),
            url_prefix: config.url_prefix.trim_end_matches('/').to_string(),
            filename_prefix: config.filename_prefix.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Public path prefix the directory is mounted under, without a trailing `/`.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn file_name(&self, original_name: &str, at: DateTime<Local>) -> String {
        format!(
            "{}_{}.{}",
            self.filename_prefix,
            at.format(TIMESTAMP_FORMAT),
            extension_of(original_name)
        )
    }

    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix, file_name)
    }

    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StoredUpload> {
        self.save_at(original_name, bytes, Local::now()).await
    }

    pub async fn save_at(
        &self,
        original_name: &str,
        bytes: &[u8],
        at: DateTime<Local>,
    ) -> std::io::Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = self.file_name(original_name, at);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored upload");

        Ok(StoredUpload {
            url: self.url_for(&file_name),
            file_name,
            path,
        })
    }
}

/// Text after the last `.`, or the whole name when there is none.
pub fn extension_of(original_name: &str) -> &str {
    original_name.rsplit('.').next().unwrap_or(original_name)
}
