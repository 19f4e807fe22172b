//! `zoco upload <path>`

use std::path::Path;

use tracing::{info, warn};
use zoco_storefront::services::Api;
use zoco_storefront::services::uploads::UPLOADS_PATH;

use super::print_json;

/// Upload an image and print its URL.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn upload(api: &Api, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Not a file: {}", path.display()))?;
    let content_type = content_type_for(path);

    info!(file_name, content_type, size = bytes.len(), "Uploading image");
    let url = api
        .products()
        .upload_image(file_name, bytes, content_type)
        .await;

    // A local reference only resolves inside the process that created it
    if url.starts_with(UPLOADS_PATH) {
        warn!("Backend unavailable; the image was not stored");
    }
    print_json(&serde_json::json!({ "url": url }))
}

/// Guess an image MIME type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
