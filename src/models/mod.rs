use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound used as the "no maximum" sentinel for rent filters.
pub const RENT_CEILING: i64 = 9999;

/// Default number of listings per result page.
pub const DEFAULT_PAGE_SIZE: u32 = 26;

/// Transaction type for a listing search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentType {
    Rent,
    Buy,
}

impl RentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Buy => "buy",
        }
    }
}

/// A geocoded point with an optional search radius in meters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearPoint {
    /// `[lng, lat]`
    pub coordinates: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// An administrative region: a state or city at the top level, a district
/// below. The hierarchy is exactly two levels deep and ids are unique across
/// the whole forest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryNode {
    /// Stable identifier; the catalog serves these as string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub alt_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BoundaryNode>>,
}

impl BoundaryNode {
    /// Display rule used everywhere a boundary is shown or matched:
    /// prefer `alt_name` over `name` when present.
    pub fn display_name(&self) -> &str {
        self.alt_name.as_deref().unwrap_or(&self.name)
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Classification of a geocoded suggestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    State,
    City,
    District,
}

/// One candidate place returned by the suggestion lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_name: Option<String>,
    pub kind: PlaceKind,
    pub has_children: bool,
}

/// Filter portion of a search request. Absent fields mean "no constraint" and
/// are omitted from the wire body, which the listing service treats
/// differently from an explicit empty value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub sort: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<(i64, i64)>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<i64>>,
    pub rent_type: Vec<RentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within_id: Option<Vec<String>>,
    pub show_price_on_request: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near: Option<NearPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchPaging {
    pub page_size: u32,
    pub page: u32,
}

impl Default for SearchPaging {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// Immutable snapshot sent to the listing service on every commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub filter: SearchFilter,
    pub paging: SearchPaging,
}

/// A listing photo or video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenementMedia {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub cdn_url: String,
    #[serde(rename = "bluredDataURL", default, skip_serializing_if = "Option::is_none")]
    pub blured_data_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenementOwner {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub count_properties: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenementUser {
    pub external_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Core listing record as served by `/tenement/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenement {
    pub id: i64,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub zip: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub rooms: Option<f64>,
    #[serde(default)]
    pub rooms_bed: Option<f64>,
    #[serde(default)]
    pub rooms_bath: Option<f64>,
    pub size: f64,
    pub rent: f64,
    #[serde(default)]
    pub rent_utilities: f64,
    #[serde(default)]
    pub rent_full: f64,
    #[serde(default)]
    pub rent_deposit: f64,
    /// `[lng, lat]`
    pub location: [f64; 2],
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub category: i64,
    #[serde(default)]
    pub sub_type: i64,
    pub rent_type: String,
    #[serde(default)]
    pub available_from: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub media: Vec<TenementMedia>,
    #[serde(default)]
    pub owner: Option<TenementOwner>,
    #[serde(default)]
    pub user: Option<TenementUser>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

/// Paginated search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub res: Vec<Tenement>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountResponse {
    pub count: u64,
}

/// Price-distribution summary used to generate selectable price breakpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramResponse {
    pub range: (f64, f64),
    pub histogram: Vec<f64>,
}

/// The catalog serves boundary ids as either strings or numbers; coerce both
/// to the string namespace.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// Treat `null` and `""` alike as an absent alternative name.
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_ids_coerce_to_strings() {
        let node: BoundaryNode =
            serde_json::from_str(r#"{"id": 900, "name": "Wien", "altName": "Vienna"}"#).unwrap();
        assert_eq!(node.id, "900");
        assert_eq!(node.display_name(), "Vienna");

        let node: BoundaryNode =
            serde_json::from_str(r#"{"id": "901", "name": "Graz", "altName": ""}"#).unwrap();
        assert_eq!(node.id, "901");
        assert_eq!(node.alt_name, None);
        assert_eq!(node.display_name(), "Graz");
    }

    #[test]
    fn filter_omits_absent_fields_from_wire_body() {
        let filter = SearchFilter {
            sort: "most_recent".to_string(),
            rent: None,
            category: Some(vec![2]),
            rent_type: vec![RentType::Rent],
            within_id: None,
            show_price_on_request: true,
            near: None,
            bbox: None,
        };
        let body = serde_json::to_value(&filter).unwrap();
        assert!(body.get("withinId").is_none());
        assert!(body.get("rent").is_none());
        assert!(body.get("near").is_none());
        assert_eq!(body["type"], serde_json::json!([2]));
        assert_eq!(body["rentType"], serde_json::json!(["rent"]));
    }
}
