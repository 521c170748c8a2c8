//! Photo Object Storage
//!
//! The registry stores only a reference string in `imageUrl`; the bytes live
//! behind this seam. `ObjectStore` covers the three boundary operations:
//! issue an upload target, map an upload URL back to an object path, and
//! fetch object bytes. `LocalObjectStore` keeps objects in a directory on
//! disk.

use ::async_trait::async_trait;
use uuid::Uuid;

/// Errors from the object store boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ObjectStoreError {
    #[error("Object not found: {path}")]
    NotFound { path: String },

    #[error("Invalid object path: {path}")]
    InvalidPath { path: String },

    #[error("Object storage I/O error: {reason}")]
    Io { reason: String },
}

/// A target a client can upload photo bytes to, plus the reference string
/// that should be stored in the certificate's `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadTarget {
    /// URL the client PUTs/POSTs the bytes to.
    pub upload_url: String,
    /// Reference to store in `imageUrl` once the upload completes.
    pub image_url: String,
}

/// Blob/object storage boundary for certificate photos.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Issue a fresh upload target for a new photo.
    fn upload_target(&self, file_name: &str) -> UploadTarget;

    /// Map an upload URL back to the stored object path.
    fn resolve_stored_path(&self, upload_url: &str) -> Result<String, ObjectStoreError>;

    /// Store object bytes under the given path.
    async fn put_object(&self, path: &str, bytes: &[u8]) -> Result<(), ObjectStoreError>;

    /// Fetch object bytes by path.
    async fn fetch_object(&self, path: &str) -> Result<Vec<u8>, ObjectStoreError>;
}

/// Object store backed by a local directory.
pub struct LocalObjectStore {
    root: std::path::PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Object names are single flat path segments; anything else is
    /// rejected so a crafted path can never escape the photo directory.
    fn checked_name(path: &str) -> Result<&str, ObjectStoreError> {
        let name = path.strip_prefix("/api/photos/").unwrap_or(path);
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(ObjectStoreError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(name)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn upload_target(&self, file_name: &str) -> UploadTarget {
        // Extension is kept for content-type sniffing; the name itself is
        // replaced with a fresh identifier.
        let ext = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let object_name = format!("{}.{}", Uuid::new_v4(), ext);
        let url = format!("/api/photos/{}", object_name);
        UploadTarget {
            upload_url: url.clone(),
            image_url: url,
        }
    }

    fn resolve_stored_path(&self, upload_url: &str) -> Result<String, ObjectStoreError> {
        Self::checked_name(upload_url).map(|name| name.to_string())
    }

    async fn put_object(&self, path: &str, bytes: &[u8]) -> Result<(), ObjectStoreError> {
        let name = Self::checked_name(path)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ObjectStoreError::Io {
                reason: e.to_string(),
            })?;
        tokio::fs::write(self.root.join(name), bytes)
            .await
            .map_err(|e| ObjectStoreError::Io {
                reason: e.to_string(),
            })
    }

    async fn fetch_object(&self, path: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let name = Self::checked_name(path)?;
        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound {
                    path: name.to_string(),
                })
            }
            Err(e) => Err(ObjectStoreError::Io {
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());

        let target = store.upload_target("ruby.jpg");
        assert!(target.upload_url.ends_with(".jpg"));

        let path = store.resolve_stored_path(&target.upload_url).unwrap();
        store.put_object(&path, b"jpeg bytes").await.unwrap();

        let bytes = store.fetch_object(&path).await.unwrap();
        assert_eq!(bytes, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_fetch_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        let err = store.fetch_object("missing.png").await.unwrap_err();
        assert!(matches!(err, ObjectStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        for bad in ["../etc/passwd", "a/b.png", "..", ""] {
            assert!(matches!(
                store.fetch_object(bad).await.unwrap_err(),
                ObjectStoreError::InvalidPath { .. }
            ));
        }
    }

    #[test]
    fn test_upload_targets_are_unique() {
        let store = LocalObjectStore::new("photos");
        let a = store.upload_target("gem.png");
        let b = store.upload_target("gem.png");
        assert_ne!(a.upload_url, b.upload_url);
    }

    proptest! {
        // Whatever the client puts in the URL, a resolved object path is a
        // single flat segment inside the photo directory.
        #[test]
        fn prop_resolved_paths_are_flat(name in "[a-zA-Z0-9. ]{0,24}") {
            let store = LocalObjectStore::new("photos");
            for candidate in [
                name.clone(),
                format!("/api/photos/{}", name),
                format!("../{}", name),
                format!("{}/..", name),
            ] {
                match store.resolve_stored_path(&candidate) {
                    Ok(resolved) => {
                        prop_assert!(!resolved.is_empty());
                        prop_assert!(!resolved.contains('/'));
                        prop_assert!(!resolved.contains('\\'));
                        prop_assert!(!resolved.contains(".."));
                    }
                    Err(err) => {
                        let is_invalid_path =
                            matches!(err, ObjectStoreError::InvalidPath { .. });
                        prop_assert!(is_invalid_path);
                    }
                }
            }
        }
    }
}
