//! Local-disk media storage for featured images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use pressroom_core::error::StorageError;
use pressroom_core::ports::{MediaStorage, UploadedFile};

/// Image types accepted as featured images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory files are written to.
    pub dir: PathBuf,
    /// URL prefix the directory is served under.
    pub public_prefix: String,
    /// Largest accepted file, in bytes.
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    /// Load from `UPLOAD_DIR` and `UPLOAD_MAX_BYTES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            public_prefix: defaults.public_prefix,
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_bytes),
        }
    }
}

/// Writes uploads into a flat directory under a collision-free name.
pub struct LocalMediaStorage {
    config: UploadConfig,
}

impl LocalMediaStorage {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    fn check(&self, file: &UploadedFile) -> Result<(), StorageError> {
        if file.data.is_empty() {
            return Err(StorageError::Rejected("Empty file".to_string()));
        }
        if file.data.len() > self.config.max_bytes {
            return Err(StorageError::Rejected(format!(
                "File too large: {} bytes (max {} bytes)",
                file.data.len(),
                self.config.max_bytes
            )));
        }

        let mime_type = file
            .content_type
            .clone()
            .filter(|t| t != "application/octet-stream")
            .or_else(|| guess_image_type(&file.filename).map(String::from))
            .unwrap_or_default();

        if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(StorageError::Rejected(format!(
                "Only image files are allowed, got '{}'",
                if mime_type.is_empty() {
                    "unknown"
                } else {
                    mime_type.as_str()
                }
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, file: UploadedFile) -> Result<String, StorageError> {
        self.check(&file)?;

        fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            &Uuid::new_v4().simple().to_string()[..8],
            sanitize_filename(&file.filename)
        );
        let path = self.config.dir.join(&name);

        fs::write(&path, &file.data)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = file.data.len(), "Stored upload");

        Ok(format!(
            "{}/{}",
            self.config.public_prefix.trim_end_matches('/'),
            name
        ))
    }

    async fn remove(&self, path: &str) -> Result<(), StorageError> {
        let prefix = format!("{}/", self.config.public_prefix.trim_end_matches('/'));
        let name = path
            .strip_prefix(&prefix)
            .filter(|name| !name.is_empty() && sanitize_filename(name) == *name)
            .ok_or_else(|| StorageError::Rejected(format!("Not a stored upload: {path}")))?;

        match fs::remove_file(self.config.dir.join(name)).await {
            Ok(()) => {
                tracing::debug!(path, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

fn guess_image_type(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Keep only the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let cleaned: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .take(100)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> LocalMediaStorage {
        LocalMediaStorage::new(UploadConfig {
            dir: dir.to_path_buf(),
            public_prefix: "/uploads".to_string(),
            max_bytes: 16,
        })
    }

    fn image(name: &str, content_type: Option<&str>, data: &[u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: content_type.map(String::from),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let path = storage
            .store(image("my photo.png", Some("image/png"), b"png-bytes"))
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with("-my_photo.png"));

        let name = path.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_type_guessed_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let result = storage
            .store(image("cover.JPG", Some("application/octet-stream"), b"x"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_non_images_and_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let not_image = storage
            .store(image("notes.txt", Some("text/plain"), b"hello"))
            .await;
        assert!(matches!(not_image, Err(StorageError::Rejected(_))));

        let too_big = storage
            .store(image("big.png", Some("image/png"), &[0u8; 17]))
            .await;
        assert!(matches!(too_big, Err(StorageError::Rejected(_))));

        let empty = storage.store(image("e.png", Some("image/png"), b"")).await;
        assert!(matches!(empty, Err(StorageError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_remove_deletes_only_stored_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        let path = storage
            .store(image("cover.png", Some("image/png"), b"png"))
            .await
            .unwrap();

        storage.remove(&path).await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // Already gone.
        storage.remove(&path).await.unwrap();

        for outside in ["/etc/passwd", "/uploads/../secret.png", "/uploads/"] {
            assert!(
                matches!(storage.remove(outside).await, Err(StorageError::Rejected(_))),
                "{outside}"
            );
        }
    }

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a b&c.png"), "a_b_c.png");
        assert_eq!(sanitize_filename(".."), "upload");
    }
}
