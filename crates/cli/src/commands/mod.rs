//! CLI command implementations.

pub mod content;
pub mod orders;
pub mod products;
pub mod upload;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;
use zoco_storefront::blob::FileBlobStore;
use zoco_storefront::config::StorefrontConfig;
use zoco_storefront::services::Api;
use zoco_storefront::supabase::SupabaseClient;

/// Build the data facade from the environment, as the server does.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the data directory
/// cannot be opened.
pub fn connect() -> Result<Api, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let blobs = FileBlobStore::open(&config.data_dir)?;
    let supabase = SupabaseClient::new(config.supabase.as_ref())?;
    let bucket = config
        .supabase
        .as_ref()
        .map_or_else(|| "products".to_string(), |s| s.storage_bucket.clone());

    info!(online = supabase.is_configured(), data_dir = %blobs.dir().display(), "Connected");
    Ok(Api::new(supabase, Arc::new(blobs), bucket))
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read and parse a YAML file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not valid YAML
/// for `T`.
pub async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_yaml::from_str(&content)?)
}
