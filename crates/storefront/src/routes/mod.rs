//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Catalog
//! GET    /api/products           - Product listing (category, min_price, max_price)
//! GET    /api/products/featured  - Featured products (limit, default 4)
//! GET    /api/products/{slug}    - Product detail
//! GET    /api/content            - Site content
//!
//! # Cart
//! GET    /api/cart               - Cart view
//! POST   /api/cart/items         - Add item
//! PATCH  /api/cart/items         - Update quantity
//! DELETE /api/cart/items         - Remove item (product_id, size)
//! DELETE /api/cart               - Clear cart
//! PUT    /api/cart/open          - Show or hide the cart drawer
//!
//! # Checkout
//! GET    /api/checkout           - Order summary
//! POST   /api/checkout           - Place order
//!
//! # Admin
//! GET    /api/admin/dashboard    - Dashboard figures
//! GET    /api/admin/orders       - Order list
//! POST   /api/admin/products     - Create product
//! POST   /api/admin/uploads      - Upload image (multipart)
//! PUT    /api/admin/content      - Save site content
//!
//! # Local uploads
//! GET    /uploads/{id}           - Image kept locally after a failed upload
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod content;
pub mod products;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Largest accepted image upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/items",
            post(cart::add).patch(cart::update).delete(cart::remove),
        )
        .route("/open", put(cart::set_open))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::orders))
        .route("/products", post(admin::create_product))
        .route(
            "/uploads",
            post(admin::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/content", put(admin::save_content))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/content", get(content::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::summary).post(checkout::place))
        .nest("/admin", admin_routes())
}

/// The complete application: routes, state, request tracing, and CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .route("/uploads/{id}", get(uploads::show))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. The backend is not checked; the
/// storefront keeps serving from its local tier when it is down.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::config::StorefrontConfig;
    use crate::services::Api;
    use crate::supabase::SupabaseClient;

    fn offline_app() -> Router {
        let api = Api::new(
            SupabaseClient::offline(),
            Arc::new(MemoryBlobStore::new()),
            "products",
        );
        app(AppState::with_api(StorefrontConfig::offline(".zoco"), api))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let response = offline_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_product_listing_and_filters() {
        let app = offline_app();

        let (status, all) = send(&app, "GET", "/api/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 6);

        let (_, tees) = send(&app, "GET", "/api/products?category=T-Shirts", None).await;
        assert_eq!(tees.as_array().unwrap().len(), 2);

        let (_, cheap) = send(&app, "GET", "/api/products?max_price=39.99", None).await;
        assert!(
            cheap
                .as_array()
                .unwrap()
                .iter()
                .all(|p| p["price"].as_f64().unwrap() <= 39.99)
        );

        let (_, featured) = send(&app, "GET", "/api/products/featured?limit=2", None).await;
        assert_eq!(featured.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let app = offline_app();

        for (method, uri) in [
            ("GET", "/api/products?max_price=abc"),
            ("GET", "/api/products?max_price=-5"),
            ("GET", "/api/products/featured?limit=many"),
            ("DELETE", "/api/cart/items?size=L"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(
                body["error"].as_str().unwrap().starts_with("Bad request"),
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_product_detail() {
        let app = offline_app();

        let (status, hoodie) = send(&app, "GET", "/api/products/black-hoodie", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hoodie["name"], "Black Hoodie");

        let (status, body) = send(&app, "GET", "/api/products/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let app = offline_app();
        let add = json!({ "slug": "black-hoodie", "size": "L", "quantity": 1 });

        let (status, first) = send(&app, "POST", "/api/cart/items", Some(add.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["outcome"], "appended");
        assert_eq!(first["cart"]["isOpen"], true);

        let (_, second) = send(&app, "POST", "/api/cart/items", Some(add)).await;
        assert_eq!(second["outcome"], "merged");
        assert_eq!(second["cart"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(second["cart"]["itemCount"], 2);

        let update = json!({ "productId": "2", "size": "L", "quantity": 0 });
        let (_, unchanged) = send(&app, "PATCH", "/api/cart/items", Some(update)).await;
        assert_eq!(unchanged["itemCount"], 2);

        let update = json!({ "productId": "2", "size": "L", "quantity": 5 });
        let (_, updated) = send(&app, "PATCH", "/api/cart/items", Some(update)).await;
        assert_eq!(updated["itemCount"], 5);

        let (_, closed) = send(&app, "PUT", "/api/cart/open", Some(json!({ "open": false }))).await;
        assert_eq!(closed["isOpen"], false);

        let (_, removed) = send(&app, "DELETE", "/api/cart/items?product_id=2&size=L", None).await;
        assert_eq!(removed["items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_add_unknown_size_is_bad_request() {
        let app = offline_app();
        let add = json!({ "slug": "silk-scarf", "size": "XXL" });
        let (status, _) = send(&app, "POST", "/api/cart/items", Some(add)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout() {
        let app = offline_app();
        let form = json!({
            "email": "buyer@zoco.shop",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "address": "1 Calle Mayor",
            "city": "Madrid",
            "postalCode": "28013",
        });

        let (status, _) = send(&app, "POST", "/api/checkout", Some(form.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let add = json!({ "slug": "silk-scarf", "size": "One Size", "quantity": 2 });
        send(&app, "POST", "/api/cart/items", Some(add)).await;

        let (_, summary) = send(&app, "GET", "/api/checkout", None).await;
        assert_eq!(summary["subtotal"].as_f64(), Some(90.0));
        assert_eq!(summary["shipping"].as_f64(), Some(0.0));

        let (status, confirmation) = send(&app, "POST", "/api/checkout", Some(form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmation["itemCount"], 2);

        let (_, cart) = send(&app, "GET", "/api/cart", None).await;
        assert_eq!(cart["itemCount"], 0);
    }

    #[tokio::test]
    async fn test_admin_offline() {
        let app = offline_app();

        let (_, dashboard) = send(&app, "GET", "/api/admin/dashboard", None).await;
        assert_eq!(dashboard["orders"], 3);
        assert_eq!(dashboard["products"], 6);

        let (_, orders) = send(&app, "GET", "/api/admin/orders", None).await;
        assert_eq!(orders[0]["id"], "#ORD-7721");

        let form = json!({ "name": "Linen Shirt", "price": 49.5, "category": "T-Shirts" });
        let (status, created) = send(&app, "POST", "/api/admin/products", Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["slug"], "linen-shirt");
        assert_eq!(created["id"].as_str().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_content_save_then_get() {
        let app = offline_app();
        let (_, mut content) = send(&app, "GET", "/api/content", None).await;
        content["hero"]["headline"] = json!("AUTUMN");

        let (_, saved) = send(&app, "PUT", "/api/admin/content", Some(content.clone())).await;
        assert_eq!(saved, json!({ "remote": false, "local": true }));

        let (_, reread) = send(&app, "GET", "/api/content", None).await;
        assert_eq!(reread, content);
    }

    #[tokio::test]
    async fn test_multipart_upload_falls_back_to_local() {
        let app = offline_app();
        let boundary = "zocoboundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"tee.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/admin/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        let url = json["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/"));

        let response = app
            .oneshot(Request::get(url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"PNGDATA");
    }
}
