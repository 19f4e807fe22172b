//! REST client for PostgREST tables and object storage.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::SupabaseError;
use crate::config::SupabaseConfig;

/// Asks PostgREST for exactly one row as a bare object (406 otherwise).
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the hosted backend.
///
/// Cheaply cloneable. An offline client (no configuration) fails every
/// call with [`SupabaseError::NotConfigured`].
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Option<Arc<SupabaseClientInner>>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    /// Always ends with `/` so that `join` appends rather than replaces.
    base_url: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field(
                "base_url",
                &self.inner.as_ref().map(|inner| inner.base_url.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a client, or an offline client when `config` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation).
    pub fn new(config: Option<&SupabaseConfig>) -> Result<Self, SupabaseError> {
        let Some(config) = config else {
            tracing::warn!(
                "SUPABASE_URL / SUPABASE_ANON_KEY missing; running in offline mode, \
                 remote data is unavailable and local fallbacks will be served"
            );
            return Ok(Self::offline());
        };

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Some(Arc::new(SupabaseClientInner {
                client,
                base_url,
                anon_key: config.anon_key.clone(),
            })),
        })
    }

    /// A client that never reaches the network.
    #[must_use]
    pub const fn offline() -> Self {
        Self { inner: None }
    }

    /// Whether a backend is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    fn inner(&self) -> Result<&SupabaseClientInner, SupabaseError> {
        self.inner.as_deref().ok_or(SupabaseError::NotConfigured)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Read every row of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport, status or decoding failure.
    #[instrument(skip(self))]
    pub async fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, SupabaseError> {
        let inner = self.inner()?;
        let url = inner.table_url(table, None)?;
        let body = inner.send(inner.authorized(inner.client.get(url))).await?;
        parse(&body)
    }

    /// Read the single row of `table` whose `column` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no (or more than one) row
    /// matches, or an error on any transport, status or decoding failure.
    #[instrument(skip(self))]
    pub async fn select_single_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<T, SupabaseError> {
        let inner = self.inner()?;
        let url = inner.table_url(table, Some((column, value)))?;
        let request = inner
            .authorized(inner.client.get(url))
            .header(ACCEPT, SINGLE_OBJECT);
        let body = inner
            .send(request)
            .await
            .map_err(|e| not_found_as(e, format!("{table}.{column}={value}")))?;
        parse(&body)
    }

    /// Insert one row and return it as stored (with generated columns).
    ///
    /// # Errors
    ///
    /// Returns an error on any transport, status or decoding failure.
    #[instrument(skip(self, row))]
    pub async fn insert_one<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<R, SupabaseError> {
        let inner = self.inner()?;
        let url = inner.table_url(table, None)?;
        let request = inner
            .authorized(inner.client.post(url))
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&[row]);
        let body = inner.send(request).await?;
        parse(&body)
    }

    /// Insert or replace one row by primary key.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or status failure.
    #[instrument(skip(self, row))]
    pub async fn upsert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), SupabaseError> {
        let inner = self.inner()?;
        let url = inner.table_url(table, None)?;
        let request = inner
            .authorized(inner.client.post(url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        inner.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Storage
    // =========================================================================

    /// Upload an object to `bucket` at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or status failure.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let inner = self.inner()?;
        let url = inner.storage_url("object", bucket, path)?;
        let request = inner
            .authorized(inner.client.post(url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        inner.send(request).await?;
        Ok(())
    }

    /// Public URL of an object in a public bucket.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotConfigured`] in offline mode.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<String, SupabaseError> {
        let inner = self.inner()?;
        Ok(inner.storage_url("object/public", bucket, path)?.to_string())
    }
}

impl SupabaseClientInner {
    fn table_url(&self, table: &str, eq: Option<(&str, &str)>) -> Result<Url, SupabaseError> {
        let mut url = self.base_url.join(&format!("rest/v1/{table}"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some((column, value)) = eq {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        Ok(url)
    }

    fn storage_url(&self, kind: &str, bucket: &str, path: &str) -> Result<Url, SupabaseError> {
        let path = urlencoding::encode(path);
        Ok(self
            .base_url
            .join(&format!("storage/v1/{kind}/{bucket}/{path}"))?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.anon_key.expose_secret();
        request
            .header("apikey", key)
            .header(AUTHORIZATION, format!("Bearer {key}"))
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(SupabaseError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

/// PostgREST answers a single-object request that matched no row with 406.
fn not_found_as(error: SupabaseError, what: String) -> SupabaseError {
    match error {
        SupabaseError::Status { status, .. } if status == StatusCode::NOT_ACCEPTABLE.as_u16() => {
            SupabaseError::NotFound(what)
        }
        other => other,
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, SupabaseError> {
    serde_json::from_str(body).map_err(|e| {
        debug!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        SupabaseError::Parse(e)
    })
}
