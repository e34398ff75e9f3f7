use std::path::PathBuf;

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};

use crate::error::StorageError;

/// Uploaded images on local disk, addressed by generated ids.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Creates the directory if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("Upload directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    /// Stores `data` and returns its id, `<unix-millis>-<filename>`.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, StorageError> {
        let image_id = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        fs::write(self.dir.join(&image_id), data).await?;
        debug!("Stored upload {} ({} bytes)", image_id, data.len());
        Ok(image_id)
    }

    pub async fn read(&self, image_id: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(image_id)?;
        fs::read(&path).await.map_err(|e| not_found_or_io(e, image_id))
    }

    pub async fn remove(&self, image_id: &str) -> Result<(), StorageError> {
        let path = self.path_for(image_id)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, image_id))?;
        info!("Image deleted: {}", path.display());
        Ok(())
    }

    fn path_for(&self, image_id: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_image_id(image_id) {
            return Err(StorageError::InvalidImageId(image_id.to_string()));
        }
        Ok(self.dir.join(image_id))
    }
}

fn not_found_or_io(error: std::io::Error, image_id: &str) -> StorageError {
    if error.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(image_id.to_string())
    } else {
        StorageError::IoError(error)
    }
}

/// Ids are single path components that cannot escape the upload directory.
pub fn is_valid_image_id(image_id: &str) -> bool {
    !image_id.is_empty()
        && !image_id.starts_with('.')
        && !image_id.contains("..")
        && !image_id.contains(['/', '\\', '\0'])
}

/// Keeps the last path component of a client-supplied file name and
/// replaces anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .replace("..", "_");

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
