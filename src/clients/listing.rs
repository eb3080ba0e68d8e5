//! Listing search service client.
//!
//! The search endpoint is best-effort: responses that miss optional fields
//! are repaired by [`normalize_search_response`] before deserialization so a
//! partially broken payload still renders. Count and histogram have no safe
//! partial result, so a shape mismatch there is a hard failure.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CountResponse, HistogramResponse, SearchFilter, SearchRequest, SearchResponse};

pub struct ListingClient {
    client: Client,
    base_url: String,
}

impl ListingClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Executes a committed search request.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let raw: Value = self.post("/tenement/search", request).await?;
        let normalized = normalize_search_response(raw);
        serde_json::from_value(normalized).map_err(|source| Error::Schema {
            endpoint: "/tenement/search".to_string(),
            source,
        })
    }

    /// Total number of listings matching the filter.
    pub async fn count(&self, filter: &SearchFilter) -> Result<CountResponse> {
        self.post("/tenement/search/count", filter).await
    }

    /// Price distribution for the filter, used to build price breakpoints.
    pub async fn histogram(&self, filter: &SearchFilter) -> Result<HistogramResponse> {
        self.post("/tenement/search/histogram", filter).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "posting listing request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| Error::Schema {
            endpoint: path.to_string(),
            source,
        })
    }
}

/// Repairs a search payload in place, with one enumerated default per field:
///
/// - missing or null `res`           -> `[]`
/// - missing or null item `media`    -> `[]`
/// - missing or null item `tags`     -> `[]`
/// - missing user contact fields     -> `null`
///   (`firstName`, `lastName`, `email`, `phone`, `imageUrl`)
/// - missing `total`/`page`/`pageSize` are defaulted at deserialization
pub fn normalize_search_response(mut raw: Value) -> Value {
    let Some(root) = raw.as_object_mut() else {
        return Value::Object(serde_json::Map::new());
    };

    let res = root.entry("res").or_insert_with(|| Value::Array(vec![]));
    match res {
        Value::Array(_) => {}
        Value::Null => *res = Value::Array(vec![]),
        _ => {
            warn!("search response `res` is not an array; treating as empty");
            *res = Value::Array(vec![]);
        }
    }

    if let Some(items) = res.as_array_mut() {
        for item in items {
            let Some(listing) = item.as_object_mut() else {
                continue;
            };

            for key in ["media", "tags"] {
                let field = listing.entry(key).or_insert_with(|| Value::Array(vec![]));
                if field.is_null() {
                    *field = Value::Array(vec![]);
                }
            }

            if let Some(user) = listing.get_mut("user").and_then(Value::as_object_mut) {
                for key in ["firstName", "lastName", "email", "phone", "imageUrl"] {
                    user.entry(key).or_insert(Value::Null);
                }
            }
        }
    }

    raw
}
