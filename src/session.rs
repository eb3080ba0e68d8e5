//! Committed-request context for one browsing session.
//!
//! Holds the last applied search request and its URL mirror. The filter
//! store can change freely between commits; nothing here reacts until the
//! user explicitly applies the selection.

use tracing::debug;

use crate::filters::FilterState;
use crate::models::{SearchPaging, SearchRequest};
use crate::{query, urlsync};

#[derive(Debug, Default)]
pub struct SearchSession {
    current: Option<SearchRequest>,
    query_string: String,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a deep-link query string into the initial filter state. Called
    /// once on load, before the first commit.
    pub fn seed_from_query(query: &str) -> FilterState {
        urlsync::parse(query)
    }

    /// Applies the current filter selection: builds a fresh page-1 request
    /// and rewrites the URL mirror. Every commit starts from page 1; only
    /// explicit re-paging keeps the page.
    pub fn commit(&mut self, state: &FilterState) -> SearchRequest {
        let request = query::build_request(state, SearchPaging::default());
        self.query_string = urlsync::serialize(state);
        debug!(query = %self.query_string, "committed search request");
        self.current = Some(request.clone());
        request
    }

    /// Moves the committed request to another page; filter fields and page
    /// size carry over. Returns nothing when no request was committed yet.
    pub fn set_page(&mut self, page: u32) -> Option<SearchRequest> {
        let next = query::repage(self.current.as_ref()?, page);
        self.current = Some(next.clone());
        Some(next)
    }

    pub fn current(&self) -> Option<&SearchRequest> {
        self.current.as_ref()
    }

    /// Query-string representation of the last commit, for the address bar.
    /// Callers should replace, not push, to keep history clean.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }
}
