//! `zoco orders list` and `zoco dashboard`

use zoco_storefront::services::Api;

use super::print_json;

/// Print recent orders.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn list(api: &Api) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&api.orders().list())
}

/// Print dashboard figures.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn dashboard(api: &Api) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&api.orders().dashboard().await)
}
