//! Free-text place suggestions from the external geocoder.
//!
//! Lookups go through the [`SuggestProvider`] seam so the debouncer can be
//! exercised without network access. Keystrokes supersede each other: a new
//! input aborts any pending timer or in-flight request before the next one
//! is armed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{PlaceKind, Suggestion};

/// Source of place suggestions for a piece of free text.
#[async_trait]
pub trait SuggestProvider: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>>;
}

/// Live suggest client against the third-party geocoder.
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    access_token: String,
    language: String,
    country: String,
    types: String,
}

impl GeocodeClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.geocode_base_url.trim_end_matches('/').to_string(),
            access_token: config.geocode_access_token.clone(),
            language: config.language.clone(),
            country: config.country.clone(),
            types: config.suggest_types.clone(),
        })
    }

    fn suggest_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search/searchbox/v1/suggest", self.base_url))
            .map_err(|e| Error::BadInput(format!("bad geocoder base url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("language", &self.language)
            .append_pair("country", &self.country)
            .append_pair("types", &self.types)
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", "10");
        Ok(url)
    }
}

#[async_trait]
impl SuggestProvider for GeocodeClient {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        let url = self.suggest_url(query)?;
        debug!(query, "issuing geocode suggest request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                endpoint: "/search/searchbox/v1/suggest".to_string(),
                status,
                body,
            });
        }

        let raw: Value = response.json().await?;
        Ok(parse_suggestions(&raw))
    }
}

/// Pulls candidate places out of the provider payload. Both the `suggestions`
/// and the legacy `features` envelope are accepted; entries with no usable
/// name are skipped.
pub fn parse_suggestions(raw: &Value) -> Vec<Suggestion> {
    let entries = raw
        .get("suggestions")
        .or_else(|| raw.get("features"))
        .and_then(Value::as_array);

    let Some(entries) = entries else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry
                .get("name")
                .or_else(|| entry.get("place_name"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())?
                .to_string();
            let id = entry
                .get("mapbox_id")
                .or_else(|| entry.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| name.clone());
            let alt_name = entry
                .pointer("/properties/full_address")
                .or_else(|| entry.pointer("/properties/name"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            Some(Suggestion {
                id,
                name,
                alt_name,
                kind: classify(place_type_of(entry).as_deref()),
                has_children: false,
            })
        })
        .collect()
}

fn place_type_of(entry: &Value) -> Option<String> {
    if let Some(tag) = entry.get("feature_type").and_then(Value::as_str) {
        return Some(tag.to_string());
    }
    entry
        .get("place_type")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Maps the provider's place-type tag onto the local hierarchy. Unknown or
/// absent tags fall back to city; that fallback is deliberate.
fn classify(tag: Option<&str>) -> PlaceKind {
    match tag {
        Some("region" | "province" | "state") => PlaceKind::State,
        Some("district" | "neighborhood" | "postcode") => PlaceKind::District,
        _ => PlaceKind::City,
    }
}

/// Debounced, cancel-on-supersede wrapper around a [`SuggestProvider`].
///
/// Each call to [`SuggestDebouncer::update`] restarts the quiet-period timer
/// and aborts whatever the previous keystroke had pending, so at most one
/// request is ever in flight and only the final text of a burst fires.
pub struct SuggestDebouncer {
    provider: Arc<dyn SuggestProvider>,
    debounce: Duration,
    results_tx: Arc<watch::Sender<Vec<Suggestion>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SuggestDebouncer {
    pub fn new(provider: Arc<dyn SuggestProvider>, debounce: Duration) -> Self {
        let (results_tx, _) = watch::channel(Vec::new());
        Self {
            provider,
            debounce,
            results_tx: Arc::new(results_tx),
            pending: Mutex::new(None),
        }
    }

    /// Receiver for the latest suggestion set.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.results_tx.subscribe()
    }

    /// Feeds the next keystroke. Blank input clears the results immediately
    /// and issues no request.
    pub fn update(&self, text: &str) {
        if let Some(handle) = self.pending.lock().expect("debouncer lock").take() {
            handle.abort();
        }

        let query = text.trim().to_string();
        if query.is_empty() {
            self.results_tx.send_replace(Vec::new());
            return;
        }

        let provider = Arc::clone(&self.provider);
        let results_tx = Arc::clone(&self.results_tx);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            match provider.suggest(&query).await {
                Ok(suggestions) => {
                    results_tx.send_replace(suggestions);
                }
                Err(err) => {
                    warn!(error = %err, query, "suggest lookup failed");
                    results_tx.send_replace(Vec::new());
                }
            }
        });

        *self.pending.lock().expect("debouncer lock") = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn classification_covers_the_tag_table() {
        assert_eq!(classify(Some("region")), PlaceKind::State);
        assert_eq!(classify(Some("province")), PlaceKind::State);
        assert_eq!(classify(Some("state")), PlaceKind::State);
        assert_eq!(classify(Some("district")), PlaceKind::District);
        assert_eq!(classify(Some("neighborhood")), PlaceKind::District);
        assert_eq!(classify(Some("postcode")), PlaceKind::District);
        assert_eq!(classify(Some("place")), PlaceKind::City);
        assert_eq!(classify(Some("poi")), PlaceKind::City);
        assert_eq!(classify(None), PlaceKind::City);
    }

    #[test]
    fn parse_accepts_suggestions_and_features_envelopes() {
        let raw = json!({
            "suggestions": [
                {
                    "mapbox_id": "mb-1",
                    "name": "Wien",
                    "feature_type": "region",
                    "properties": {"full_address": "Wien, Austria"}
                },
                {"name": "", "feature_type": "place"}
            ]
        });
        let parsed = parse_suggestions(&raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "mb-1");
        assert_eq!(parsed[0].kind, PlaceKind::State);
        assert_eq!(parsed[0].alt_name.as_deref(), Some("Wien, Austria"));
        assert!(!parsed[0].has_children);

        let legacy = json!({
            "features": [
                {"id": "f-9", "place_name": "Leopoldstadt", "place_type": ["neighborhood"]}
            ]
        });
        let parsed = parse_suggestions(&legacy);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Leopoldstadt");
        assert_eq!(parsed[0].kind, PlaceKind::District);
    }

    #[test]
    fn parse_of_unrecognized_payload_is_empty() {
        assert!(parse_suggestions(&json!({"result": []})).is_empty());
        assert!(parse_suggestions(&json!(null)).is_empty());
    }

    struct CountingProvider {
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl CountingProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SuggestProvider for CountingProvider {
        async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            Ok(vec![Suggestion {
                id: query.to_string(),
                name: query.to_string(),
                alt_name: None,
                kind: PlaceKind::City,
                has_children: false,
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_issue_one_request_for_the_final_text() {
        let provider = CountingProvider::new();
        let debouncer =
            SuggestDebouncer::new(provider.clone(), Duration::from_millis(250));
        let mut rx = debouncer.subscribe();

        for text in ["w", "wi", "wie", "wien"] {
            debouncer.update(text);
            tokio::task::yield_now().await;
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        // Let the final quiet period elapse.
        tokio::time::advance(Duration::from_millis(300)).await;
        rx.changed().await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*provider.queries.lock().unwrap(), vec!["wien".to_string()]);
        assert_eq!(rx.borrow()[0].name, "wien");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_clears_without_a_request() {
        let provider = CountingProvider::new();
        let debouncer =
            SuggestDebouncer::new(provider.clone(), Duration::from_millis(250));
        let mut rx = debouncer.subscribe();

        debouncer.update("wien");
        tokio::task::yield_now().await;
        debouncer.update("   ");
        rx.changed().await.unwrap();

        assert!(rx.borrow().is_empty());
        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
