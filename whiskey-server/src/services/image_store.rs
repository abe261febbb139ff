//! Local image storage
//!
//! Uploaded images are written to the upload directory as
//! `<uuid-v4><ext>` and referenced as `/images/<uuid-v4><ext>`.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use shared::error::{AppError, AppResult, ErrorCode};
use tokio::fs;
use uuid::Uuid;

/// URL prefix of every reference this store hands out
pub const IMAGE_URL_PREFIX: &str = "/images/";

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, only used for its extension
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// 图片存储服务
#[derive(Debug, Clone)]
pub struct ImageStore {
    /// 图片目录路径
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `upload` under a fresh name and return its reference
    pub async fn save(&self, upload: &ImageUpload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::new(ErrorCode::ImageEmpty));
        }

        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::storage(format!("Failed to create upload directory: {e}"))
                .with_detail("path", self.root.display().to_string())
        })?;

        let file_name = format!(
            "{}{}",
            Uuid::new_v4(),
            extension_of(upload.file_name.as_deref())
        );
        let path = self.root.join(&file_name);

        fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;

        tracing::info!(file = %file_name, size = upload.bytes.len(), "Image stored");
        Ok(format!("{IMAGE_URL_PREFIX}{file_name}"))
    }

    /// Remove the file behind `reference`.
    ///
    /// Unmanaged references are left alone, a missing file is a no-op and any
    /// other failure is logged and swallowed. Returns whether a file was removed.
    pub async fn delete(&self, reference: &str) -> bool {
        let Some(file_name) = managed_file_name(reference) else {
            tracing::debug!(reference = %reference, "Skipping unmanaged image reference");
            return false;
        };

        match fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => {
                tracing::info!(file = %file_name, "Image deleted");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Failed to delete image");
                false
            }
        }
    }

    /// Path of a served file, `None` for anything that is not a plain file name
    pub fn path_for(&self, file_name: &str) -> Option<PathBuf> {
        is_plain_file_name(file_name).then(|| self.root.join(file_name))
    }
}

/// File name behind a reference this store manages
pub fn managed_file_name(reference: &str) -> Option<&str> {
    reference
        .strip_prefix(IMAGE_URL_PREFIX)
        .filter(|name| is_plain_file_name(name))
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Everything from the last `.` of the base name, or empty
fn extension_of(file_name: Option<&str>) -> &str {
    let base = file_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .unwrap_or("");
    base.rfind('.').map(|i| &base[i..]).unwrap_or("")
}
