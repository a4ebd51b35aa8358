use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("uploaded file exceeds {limit_mb} MB")]
    TooLarge { limit_mb: u64 },
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) async fn ensure_uploads_dir(settings: &Settings) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&settings.uploads().uploads_dir).await
}

/// Store a profile picture on local disk under a fresh UUID name and return
/// the public path it is served from.
pub(crate) async fn store_profile_picture(
    settings: &Settings,
    original_filename: &str,
    bytes: &[u8],
) -> Result<String, UploadError> {
    let limit_mb = settings.uploads().max_upload_size_mb;
    if bytes.len() as u64 > limit_mb * 1024 * 1024 {
        return Err(UploadError::TooLarge { limit_mb });
    }

    let extension = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let filename = format!("{}.{extension}", Uuid::new_v4());
    let mut path = PathBuf::from(&settings.uploads().uploads_dir);
    path.push(&filename);

    tokio::fs::write(&path, bytes).await?;

    Ok(format!("/uploads/{filename}"))
}
