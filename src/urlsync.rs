//! Query-string mirror of the committed filter state.
//!
//! The address bar is the only persisted representation of a search, so the
//! mapping has to be total in both directions: every non-default field
//! serializes to a key, and parsing is permissive — a malformed value drops
//! that field back to its default instead of failing the whole string.

use url::form_urlencoded;

use crate::filters::FilterState;
use crate::models::{NearPoint, RentType};

const KEY_WITHIN: &str = "withinId";
const KEY_CATEGORY: &str = "type";
const KEY_RENT_TYPE: &str = "rentType";
const KEY_RENT: &str = "rent";
const KEY_SHOW: &str = "show";
const KEY_NEAR: &str = "near";
const KEY_BBOX: &str = "bbox";

/// Serializes the state into a query string (no leading `?`). Fields at
/// their default value are omitted entirely.
pub fn serialize(state: &FilterState) -> String {
    let defaults = FilterState::default();
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !state.within_id.is_empty() {
        query.append_pair(KEY_WITHIN, &state.within_id.join(","));
    }
    if state.category != defaults.category {
        let codes: Vec<String> = state.category.iter().map(i64::to_string).collect();
        query.append_pair(KEY_CATEGORY, &codes.join(","));
    }
    if state.rent_type != defaults.rent_type {
        if let Some(rent_type) = state.rent_type.first() {
            query.append_pair(KEY_RENT_TYPE, rent_type.as_str());
        }
    }
    if !state.rent_is_default() {
        query.append_pair(KEY_RENT, &format!("{}-{}", state.rent.0, state.rent.1));
    }
    if state.show_price_on_request != defaults.show_price_on_request {
        query.append_pair(
            KEY_SHOW,
            if state.show_price_on_request { "1" } else { "0" },
        );
    }
    if let Some(near) = &state.near {
        let mut parts = vec![near.coordinates[0].to_string(), near.coordinates[1].to_string()];
        if let Some(radius) = near.radius {
            parts.push(radius.to_string());
        }
        query.append_pair(KEY_NEAR, &parts.join(","));
    }
    if let Some(bbox) = &state.bbox {
        let parts: Vec<String> = bbox.iter().map(f64::to_string).collect();
        query.append_pair(KEY_BBOX, &parts.join(","));
    }

    query.finish()
}

/// Parses a query string (with or without a leading `?`) into a filter
/// state. Unknown keys are ignored; malformed values leave the field at its
/// default. Location keys are applied through the regular transitions, so
/// the mutual-exclusion rule holds even for a hand-edited URL carrying
/// several of them.
pub fn parse(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = FilterState::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            KEY_WITHIN => {
                let ids: Vec<String> = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !ids.is_empty() {
                    state = state.set_within(ids);
                }
            }
            KEY_CATEGORY => {
                let codes: Vec<i64> = value
                    .split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect();
                if !codes.is_empty() {
                    state = state.set_category(codes);
                }
            }
            KEY_RENT_TYPE => match value.as_ref() {
                "rent" => state = state.set_rent_type(RentType::Rent),
                "buy" => state = state.set_rent_type(RentType::Buy),
                _ => {}
            },
            KEY_RENT => {
                if let Some((min, max)) = parse_rent(&value) {
                    state = state.set_rent(min, max);
                }
            }
            KEY_SHOW => match value.as_ref() {
                "1" => state = state.set_show_price_on_request(true),
                "0" => state = state.set_show_price_on_request(false),
                _ => {}
            },
            KEY_NEAR => {
                if let Some(near) = parse_near(&value) {
                    state = state.set_near(Some(near));
                }
            }
            KEY_BBOX => {
                if let Some(bbox) = parse_bbox(&value) {
                    state = state.set_bbox(Some(bbox));
                }
            }
            _ => {}
        }
    }

    state
}

fn parse_rent(value: &str) -> Option<(i64, i64)> {
    let (min, max) = value.split_once('-')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

fn parse_near(value: &str) -> Option<NearPoint> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }
    let lng: f64 = parts[0].trim().parse().ok()?;
    let lat: f64 = parts[1].trim().parse().ok()?;
    let radius = match parts.get(2) {
        Some(raw) => Some(raw.trim().parse().ok()?),
        None => None,
    };
    Some(NearPoint {
        coordinates: [lng, lat],
        radius,
    })
}

fn parse_bbox(value: &str) -> Option<[f64; 4]> {
    let mut out = [0.0; 4];
    let mut count = 0;
    for part in value.split(',') {
        if count == 4 {
            return None;
        }
        out[count] = part.trim().parse().ok()?;
        count += 1;
    }
    (count == 4).then_some(out)
}
