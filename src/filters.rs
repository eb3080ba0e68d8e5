//! Filter selection state and the store that owns it.
//!
//! Several filter dimensions are mutually exclusive: a boundary selection, a
//! geocoded near point, and a bounding box may never be active at the same
//! time. Every transition below preserves that rule; setting one location
//! field clears the other two. The draft boundary list is the one exception,
//! since it is provisional until applied.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::{NearPoint, RentType, RENT_CEILING};

/// The complete user-facing filter selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected boundary ids, in the order the user picked them.
    pub within_id: Vec<String>,
    /// Staged boundary ids while a location picker is open; empty otherwise.
    pub draft_within_id: Vec<String>,
    /// Category codes; multi-valued in shape, single-valued in practice.
    pub category: Vec<i64>,
    /// One-element sequence, for symmetry with `category`.
    pub rent_type: Vec<RentType>,
    /// `(min, max)`; `0` and [`RENT_CEILING`] mean unbounded.
    pub rent: (i64, i64),
    /// Whether listings without a disclosed price are included.
    pub show_price_on_request: bool,
    pub near: Option<NearPoint>,
    pub bbox: Option<[f64; 4]>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            within_id: Vec::new(),
            draft_within_id: Vec::new(),
            category: vec![2],
            rent_type: vec![RentType::Rent],
            rent: (0, RENT_CEILING),
            show_price_on_request: true,
            near: None,
            bbox: None,
        }
    }
}

impl FilterState {
    /// Replaces the boundary selection; clears `near` and `bbox`.
    pub fn set_within(mut self, ids: Vec<String>) -> Self {
        self.within_id = ids;
        self.near = None;
        self.bbox = None;
        self
    }

    /// Replaces only the draft; the committed location fields stay put.
    pub fn set_draft_within(mut self, ids: Vec<String>) -> Self {
        self.draft_within_id = ids;
        self
    }

    /// Moves the draft into the committed selection and clears the other
    /// location fields. An empty draft is a no-op: the prior selection
    /// stays intact.
    pub fn apply_draft(mut self) -> Self {
        if self.draft_within_id.is_empty() {
            return self;
        }
        self.within_id = std::mem::take(&mut self.draft_within_id);
        self.near = None;
        self.bbox = None;
        self
    }

    /// Drops the draft without committing it.
    pub fn discard_draft(mut self) -> Self {
        self.draft_within_id.clear();
        self
    }

    pub fn set_category(mut self, codes: Vec<i64>) -> Self {
        self.category = codes;
        self
    }

    pub fn set_rent_type(mut self, value: RentType) -> Self {
        self.rent_type = vec![value];
        self
    }

    /// Bounds are validated at the UI edge; this transition stores them as
    /// given.
    pub fn set_rent(mut self, min: i64, max: i64) -> Self {
        self.rent = (min, max);
        self
    }

    pub fn set_show_price_on_request(mut self, show: bool) -> Self {
        self.show_price_on_request = show;
        self
    }

    /// Sets the geocoded near point; clears the boundary selection and bbox.
    pub fn set_near(mut self, near: Option<NearPoint>) -> Self {
        self.near = near;
        self.within_id.clear();
        self.bbox = None;
        self
    }

    /// Sets the bounding box; clears the boundary selection and near point.
    pub fn set_bbox(mut self, bbox: Option<[f64; 4]>) -> Self {
        self.bbox = bbox;
        self.within_id.clear();
        self.near = None;
        self
    }

    /// Restores every field to its documented default.
    pub fn reset(self) -> Self {
        Self::default()
    }

    /// True when the rent bounds are the unbounded sentinel pair.
    pub fn rent_is_default(&self) -> bool {
        self.rent == (0, RENT_CEILING)
    }
}

/// Owns the live [`FilterState`] and notifies subscribers on every change.
///
/// Single writer, synchronous transitions, last write wins. Renderers call
/// [`FilterStore::subscribe`] and react to changes instead of polling.
pub struct FilterStore {
    tx: watch::Sender<FilterState>,
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    /// Receiver that yields every committed transition.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    /// Applies a pure transition to the current state and publishes the
    /// result.
    pub fn update(&self, transition: impl FnOnce(FilterState) -> FilterState) {
        let current = self.tx.borrow().clone();
        self.tx.send_replace(transition(current));
    }

    pub fn set_within(&self, ids: Vec<String>) {
        self.update(|s| s.set_within(ids));
    }

    pub fn set_draft_within(&self, ids: Vec<String>) {
        self.update(|s| s.set_draft_within(ids));
    }

    pub fn apply_draft(&self) {
        self.update(FilterState::apply_draft);
    }

    pub fn discard_draft(&self) {
        self.update(FilterState::discard_draft);
    }

    pub fn set_category(&self, codes: Vec<i64>) {
        self.update(|s| s.set_category(codes));
    }

    pub fn set_rent_type(&self, value: RentType) {
        self.update(|s| s.set_rent_type(value));
    }

    pub fn set_rent(&self, min: i64, max: i64) {
        self.update(|s| s.set_rent(min, max));
    }

    pub fn set_show_price_on_request(&self, show: bool) {
        self.update(|s| s.set_show_price_on_request(show));
    }

    pub fn set_near(&self, near: Option<NearPoint>) {
        self.update(|s| s.set_near(near));
    }

    pub fn set_bbox(&self, bbox: Option<[f64; 4]>) {
        self.update(|s| s.set_bbox(bbox));
    }

    pub fn reset(&self) {
        self.update(FilterState::reset);
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}
