//! Boundary catalog client and the reconciled view over its two feeds.

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::BoundaryNode;

/// Fetches administrative boundaries from the catalog service.
pub struct BoundaryClient {
    client: Client,
    base_url: String,
}

impl BoundaryClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The curated "popular" subset shown first in the picker.
    pub async fn fetch_popular(&self) -> Result<Vec<BoundaryNode>> {
        self.fetch("/geo/boundary/popular").await
    }

    /// The full boundary forest.
    pub async fn fetch_all(&self) -> Result<Vec<BoundaryNode>> {
        self.fetch("/geo/boundary").await
    }

    async fn fetch(&self, path: &str) -> Result<Vec<BoundaryNode>> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "fetching boundary collection");

        let response = self.client.get(&url).send().await?;
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

/// The two boundary feeds reconciled for display.
///
/// A failed fetch degrades to an empty collection with an error marker so
/// category and price filters stay usable when the catalog is down.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCatalog {
    popular: Vec<BoundaryNode>,
    all: Vec<BoundaryNode>,
    pub popular_error: Option<String>,
    pub all_error: Option<String>,
}

impl BoundaryCatalog {
    /// Fetches both feeds concurrently; they share no state and race freely.
    pub async fn load(client: &BoundaryClient) -> Self {
        let (popular, all) = tokio::join!(client.fetch_popular(), client.fetch_all());

        let (popular, popular_error) = match popular {
            Ok(nodes) => (nodes, None),
            Err(err) => {
                warn!(error = %err, "popular boundary fetch failed");
                (Vec::new(), Some(err.to_string()))
            }
        };
        let (all, all_error) = match all {
            Ok(nodes) => (nodes, None),
            Err(err) => {
                warn!(error = %err, "full boundary fetch failed");
                (Vec::new(), Some(err.to_string()))
            }
        };

        Self {
            popular,
            all,
            popular_error,
            all_error,
        }
    }

    pub fn from_parts(popular: Vec<BoundaryNode>, all: Vec<BoundaryNode>) -> Self {
        Self {
            popular,
            all,
            popular_error: None,
            all_error: None,
        }
    }

    pub fn popular(&self) -> &[BoundaryNode] {
        &self.popular
    }

    /// The "by state" group: the full set minus anything already present in
    /// the popular subset.
    pub fn other(&self) -> Vec<&BoundaryNode> {
        let popular_ids: std::collections::HashSet<&str> =
            self.popular.iter().map(|b| b.id.as_str()).collect();
        self.all
            .iter()
            .filter(|b| !popular_ids.contains(b.id.as_str()))
            .collect()
    }

    /// Every top-level node, popular first, then the remainder.
    pub fn top_level(&self) -> Vec<&BoundaryNode> {
        self.popular.iter().chain(self.other()).collect()
    }

    /// Resolves selected ids against the forest, preserving selection order.
    /// Ids with no matching node are skipped.
    pub fn selected(&self, ids: &[String]) -> Vec<BoundaryNode> {
        let mut by_id = std::collections::HashMap::new();
        for node in self.top_level() {
            by_id.entry(node.id.as_str()).or_insert_with(|| node.clone());
            for child in node.children.iter().flatten() {
                by_id
                    .entry(child.id.as_str())
                    .or_insert_with(|| child.clone());
            }
        }
        ids.iter()
            .filter_map(|id| by_id.get(id.as_str()).cloned())
            .collect()
    }

    /// Case-insensitive name lookup across parents and children, used when a
    /// typed location was never turned into a selection: exact match on the
    /// preferred display name first, then a partial match in either
    /// direction.
    pub fn find_by_name(&self, text: &str) -> Option<String> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let nodes = self.top_level();
        for node in &nodes {
            if node.display_name().to_lowercase() == needle {
                return Some(node.id.clone());
            }
            for child in node.children.iter().flatten() {
                if child.display_name().to_lowercase() == needle {
                    return Some(child.id.clone());
                }
            }
        }

        for node in &nodes {
            let name = node.display_name().to_lowercase();
            if name.contains(&needle) || needle.contains(&name) {
                return Some(node.id.clone());
            }
            for child in node.children.iter().flatten() {
                let name = child.display_name().to_lowercase();
                if name.contains(&needle) || needle.contains(&name) {
                    return Some(child.id.clone());
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, alt: Option<&str>, children: Vec<BoundaryNode>) -> BoundaryNode {
        BoundaryNode {
            id: id.to_string(),
            name: name.to_string(),
            alt_name: alt.map(str::to_string),
            children: (!children.is_empty()).then_some(children),
        }
    }

    fn catalog() -> BoundaryCatalog {
        let vienna = node(
            "900",
            "Wien",
            Some("Vienna"),
            vec![
                node("900-01", "Innere Stadt", None, vec![]),
                node("900-02", "Leopoldstadt", None, vec![]),
            ],
        );
        let graz = node("601", "Graz", None, vec![]);
        let tirol = node("700", "Tirol", Some("Tyrol"), vec![]);
        BoundaryCatalog::from_parts(
            vec![vienna.clone(), graz.clone()],
            vec![vienna, graz, tirol],
        )
    }

    #[test]
    fn other_excludes_popular_ids() {
        let catalog = catalog();
        let other: Vec<&str> = catalog.other().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(other, vec!["700"]);
    }

    #[test]
    fn selected_preserves_selection_order() {
        let catalog = catalog();
        let selected = catalog.selected(&[
            "900-02".to_string(),
            "601".to_string(),
            "missing".to_string(),
            "900-01".to_string(),
        ]);
        let names: Vec<&str> = selected.iter().map(BoundaryNode::display_name).collect();
        assert_eq!(names, vec!["Leopoldstadt", "Graz", "Innere Stadt"]);
    }

    #[test]
    fn find_by_name_prefers_exact_over_partial() {
        let catalog = catalog();
        assert_eq!(catalog.find_by_name("vienna"), Some("900".to_string()));
        assert_eq!(catalog.find_by_name(" Leopoldstadt "), Some("900-02".to_string()));
        // Partial fallback matches the alt name.
        assert_eq!(catalog.find_by_name("tyr"), Some("700".to_string()));
        assert_eq!(catalog.find_by_name(""), None);
        assert_eq!(catalog.find_by_name("atlantis"), None);
    }

    #[test]
    fn empty_catalog_yields_empty_views() {
        let catalog = BoundaryCatalog::default();
        assert!(catalog.popular().is_empty());
        assert!(catalog.other().is_empty());
        assert!(catalog.selected(&["900".to_string()]).is_empty());
    }
}
