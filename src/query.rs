//! Derives the server-bound request from a committed filter selection.

use crate::filters::FilterState;
use crate::models::{SearchFilter, SearchPaging, SearchRequest};

/// The only sort order the current feature set uses.
pub const SORT_MOST_RECENT: &str = "most_recent";

/// Builds a search request from the committed filter state.
///
/// Pure and deterministic: the same state and paging always produce the same
/// request. Absence rules follow the wire contract — `withinId` only when a
/// boundary selection exists, `rent` only when the bounds differ from the
/// unbounded defaults, `type` only when a category is chosen.
pub fn build_request(state: &FilterState, paging: SearchPaging) -> SearchRequest {
    SearchRequest {
        filter: SearchFilter {
            sort: SORT_MOST_RECENT.to_string(),
            rent: (!state.rent_is_default()).then_some(state.rent),
            category: (!state.category.is_empty()).then(|| state.category.clone()),
            rent_type: state.rent_type.clone(),
            within_id: (!state.within_id.is_empty()).then(|| state.within_id.clone()),
            show_price_on_request: state.show_price_on_request,
            near: state.near.clone(),
            bbox: state.bbox,
        },
        paging,
    }
}

/// Re-pages an already committed request: only `page` changes, every filter
/// field and the page size carry over untouched.
pub fn repage(request: &SearchRequest, page: u32) -> SearchRequest {
    SearchRequest {
        filter: request.filter.clone(),
        paging: SearchPaging {
            page,
            ..request.paging
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NearPoint, RentType, RENT_CEILING};

    #[test]
    fn default_state_builds_minimal_filter() {
        let request = build_request(&FilterState::default(), SearchPaging::default());

        assert_eq!(request.filter.sort, SORT_MOST_RECENT);
        assert_eq!(request.filter.rent, None, "default bounds omit rent");
        assert_eq!(request.filter.within_id, None);
        assert_eq!(request.filter.category, Some(vec![2]));
        assert_eq!(request.filter.rent_type, vec![RentType::Rent]);
        assert!(request.filter.show_price_on_request);
        assert_eq!(request.paging.page, 1);
        assert_eq!(request.paging.page_size, 26);
    }

    #[test]
    fn explicit_ceiling_bounds_still_count_as_default() {
        let state = FilterState::default().set_rent(0, RENT_CEILING);
        let request = build_request(&state, SearchPaging::default());
        assert_eq!(request.filter.rent, None);
    }

    #[test]
    fn non_default_rent_is_carried() {
        let state = FilterState::default().set_rent(500, 1200);
        let request = build_request(&state, SearchPaging::default());
        assert_eq!(request.filter.rent, Some((500, 1200)));
    }

    #[test]
    fn within_id_present_only_for_non_empty_selection() {
        let state = FilterState::default().set_within(vec!["c1".into(), "d4".into()]);
        let request = build_request(&state, SearchPaging::default());
        assert_eq!(
            request.filter.within_id,
            Some(vec!["c1".to_string(), "d4".to_string()])
        );
    }

    #[test]
    fn near_and_bbox_pass_through() {
        let state = FilterState::default().set_near(Some(NearPoint {
            coordinates: [16.37, 48.2],
            radius: Some(5000.0),
        }));
        let request = build_request(&state, SearchPaging::default());
        assert!(request.filter.near.is_some());
        assert_eq!(request.filter.within_id, None);
        assert_eq!(request.filter.bbox, None);
    }

    #[test]
    fn build_request_is_deterministic() {
        let state = FilterState::default()
            .set_within(vec!["a".into(), "b".into()])
            .set_rent(100, 900);
        let a = build_request(&state, SearchPaging::default());
        let b = build_request(&state, SearchPaging::default());
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn repage_changes_only_the_page() {
        let state = FilterState::default().set_rent(300, 800);
        let first = build_request(&state, SearchPaging::default());
        let third = repage(&first, 3);

        assert_eq!(third.paging.page, 3);
        assert_eq!(third.paging.page_size, first.paging.page_size);
        assert_eq!(third.filter, first.filter);
    }
}
