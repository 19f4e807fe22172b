//! Site content get/save.
//!
//! The content lives in a single `site_content` row with id `global`. Every
//! save is also written to the local blob, so the last content saved on this
//! machine survives a backend outage.

use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};
use zoco_core::SiteContent;

use super::Api;
use crate::blob::{self, keys};
use crate::fixtures;

/// Backend table holding site content.
pub const SITE_CONTENT_TABLE: &str = "site_content";

/// Id of the single site content row.
const GLOBAL_ROW: &str = "global";

#[derive(Serialize, Deserialize)]
struct ContentRow<C> {
    id: String,
    content: C,
}

/// Which tiers accepted a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentSaved {
    pub remote: bool,
    pub local: bool,
}

/// Site content operations, obtained from [`Api::settings`].
#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    api: &'a Api,
}

impl<'a> Settings<'a> {
    pub(super) const fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Current site content: backend, then local blob, then defaults.
    #[instrument(skip(self))]
    pub async fn get_content(&self) -> SiteContent {
        match self
            .api
            .supabase()
            .select_single_eq::<ContentRow<SiteContent>>(SITE_CONTENT_TABLE, "id", GLOBAL_ROW)
            .await
        {
            Ok(row) => return row.content,
            Err(e) => warn!(error = %e, "Content fetch failed (using local copy)"),
        }

        match blob::load_json_async::<SiteContent>(self.api.blobs(), keys::SITE_CONTENT).await {
            Ok(Some(content)) => content,
            Ok(None) => fixtures::default_content(),
            Err(e) => {
                warn!(error = %e, "Local content unreadable (using defaults)");
                fixtures::default_content()
            }
        }
    }

    /// Save site content to the backend and the local blob.
    ///
    /// Never fails; the returned flags say which tiers took the write.
    #[instrument(skip(self, content))]
    pub async fn save_content(&self, content: &SiteContent) -> ContentSaved {
        let row = ContentRow {
            id: GLOBAL_ROW.to_string(),
            content,
        };
        let remote = match self.api.supabase().upsert(SITE_CONTENT_TABLE, &row).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Content save failed (saved locally only)");
                false
            }
        };

        let saved = blob::save_json_async(self.api.blobs(), keys::SITE_CONTENT, content).await;
        let local = match saved {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to write local content copy");
                false
            }
        };

        ContentSaved { remote, local }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blob::{BlobStore, MemoryBlobStore};
    use crate::supabase::SupabaseClient;

    fn offline_api() -> (Api, Arc<MemoryBlobStore>) {
        let blobs = Arc::new(MemoryBlobStore::new());
        let api = Api::new(SupabaseClient::offline(), blobs.clone(), "products");
        (api, blobs)
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_saved() {
        let (api, _) = offline_api();
        assert_eq!(api.settings().get_content().await, fixtures::default_content());
    }

    #[tokio::test]
    async fn test_save_then_get_offline() {
        let (api, _) = offline_api();
        let mut content = fixtures::default_content();
        content.hero.headline = "NEW DROP".to_string();

        let saved = api.settings().save_content(&content).await;
        assert_eq!(saved, ContentSaved { remote: false, local: true });
        assert_eq!(api.settings().get_content().await, content);
    }

    #[tokio::test]
    async fn test_malformed_blob_uses_defaults() {
        let (api, blobs) = offline_api();
        blobs.set(keys::SITE_CONTENT, "{\"hero\":").ok();
        assert_eq!(api.settings().get_content().await, fixtures::default_content());
    }
}
