//! On-disk storage for item photos.
//!
//! Files land in a single flat directory under a generated name
//! `<base>-<epoch millis><.ext>` and are served back from `/uploads`.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::error::{ItemError, ItemResult};
use crate::models::ImageUpload;

/// Extensions accepted for uploads, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// URL prefix under which stored files are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> ItemResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `upload` to disk and return its public reference.
    ///
    /// Files whose extension is not an image extension are rejected before
    /// anything is written.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn save(&self, upload: &ImageUpload) -> ItemResult<String> {
        let stored = stored_file_name(&upload.file_name, Utc::now().timestamp_millis())?;

        tokio::fs::write(self.dir.join(&stored), &upload.bytes)
            .await
            .map_err(|e| ItemError::Storage(format!("failed to write {stored}: {e}")))?;

        info!(stored = %stored, "Image stored");
        Ok(format!("{UPLOADS_URL_PREFIX}/{stored}"))
    }
}

/// Split the last path component of `original` into base name and
/// extension (with its dot). A leading dot does not start an extension.
pub fn split_file_name(original: &str) -> (&str, &str) {
    let name = original.rsplit('/').next().unwrap_or(original);
    match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    }
}

pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Name under which `original` is stored; the extension keeps its case.
pub fn stored_file_name(original: &str, timestamp_ms: i64) -> ItemResult<String> {
    let (base, ext) = split_file_name(original);
    if !is_allowed_extension(ext) {
        return Err(ItemError::UnsupportedFileType(original.to_string()));
    }
    Ok(format!("{base}-{timestamp_ms}{ext}"))
}
