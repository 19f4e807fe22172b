//! `zoco content ...`

use std::path::Path;

use tracing::{info, warn};
use zoco_core::SiteContent;
use zoco_storefront::services::Api;

use super::{print_json, read_yaml};

/// Print the current site content.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn show(api: &Api) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&api.settings().get_content().await)
}

/// Replace the site content with the contents of a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if neither the
/// backend nor the local store accepted the write.
pub async fn set(api: &Api, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content: SiteContent = read_yaml(file).await?;
    let saved = api.settings().save_content(&content).await;

    if !saved.remote && !saved.local {
        return Err("Content was not saved anywhere".into());
    }
    if saved.remote {
        info!("Content saved");
    } else {
        warn!("Backend unavailable; content saved locally only");
    }
    print_json(&saved)
}
