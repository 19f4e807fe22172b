//! Ephemeral local uploads.
//!
//! When an image cannot be pushed to backend storage it is kept in memory
//! and addressed by a process-local reference (`/uploads/<id>`). References
//! stop resolving after an hour, on eviction under memory pressure, or when
//! the process exits.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

/// URL prefix under which local uploads are served.
pub const UPLOADS_PATH: &str = "/uploads";

/// Total bytes of image data kept in memory.
const MAX_TOTAL_BYTES: u64 = 64 * 1024 * 1024;

/// How long a local upload stays addressable.
const TIME_TO_LIVE: Duration = Duration::from_secs(60 * 60);

/// An image held in memory.
#[derive(Debug)]
pub struct LocalUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Bounded registry of local uploads.
#[derive(Clone)]
pub struct LocalUploads {
    cache: Cache<Uuid, Arc<LocalUpload>>,
}

impl std::fmt::Debug for LocalUploads {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalUploads")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl Default for LocalUploads {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalUploads {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_TOTAL_BYTES)
            .weigher(|_id: &Uuid, upload: &Arc<LocalUpload>| {
                u32::try_from(upload.bytes.len()).unwrap_or(u32::MAX)
            })
            .time_to_live(TIME_TO_LIVE)
            .build();
        Self { cache }
    }

    /// Store an upload and return its reference.
    pub async fn insert(&self, upload: LocalUpload) -> String {
        let id = Uuid::new_v4();
        self.cache.insert(id, Arc::new(upload)).await;
        format!("{UPLOADS_PATH}/{id}")
    }

    /// Look up an upload by id.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<LocalUpload>> {
        self.cache.get(id).await
    }

    /// Resolve a reference previously returned by [`LocalUploads::insert`].
    pub async fn resolve(&self, reference: &str) -> Option<Arc<LocalUpload>> {
        let id = reference
            .strip_prefix(UPLOADS_PATH)?
            .strip_prefix('/')?
            .parse::<Uuid>()
            .ok()?;
        self.get(&id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_resolve() {
        let uploads = LocalUploads::new();
        let reference = uploads
            .insert(LocalUpload {
                file_name: "tee.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await;

        assert!(reference.starts_with("/uploads/"));
        let upload = uploads.resolve(&reference).await.unwrap();
        assert_eq!(upload.bytes, vec![1, 2, 3]);
        assert_eq!(upload.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_unknown_references() {
        let uploads = LocalUploads::new();
        assert!(uploads.resolve("/uploads/not-a-uuid").await.is_none());
        assert!(uploads.resolve("https://cdn/x.png").await.is_none());
        assert!(uploads
            .resolve(&format!("/uploads/{}", Uuid::new_v4()))
            .await
            .is_none());
    }
}
