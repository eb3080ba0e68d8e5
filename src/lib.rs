//! flatfinder - property-search filter engine
//!
//! The core of this crate is the filter-state reconciliation model behind a
//! listings search UI: several mutually exclusive location dimensions
//! (boundary selection, geocoded near point, bounding box) plus category,
//! price and transaction type, kept consistent through pure transitions,
//! derived into a server-bound request on commit, and mirrored into a
//! shareable query string.
//!
//! ```no_run
//! use flatfinder::{Config, FilterStore, ListingClient, SearchSession};
//!
//! # async fn run() -> flatfinder::Result<()> {
//! let config = Config::default();
//! let filters = FilterStore::default();
//! filters.set_rent(500, 1500);
//!
//! let mut session = SearchSession::new();
//! let request = session.commit(&filters.get());
//!
//! let listings = ListingClient::new(&config)?.search(&request).await?;
//! println!("{} listings, share: ?{}", listings.total, session.query_string());
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod query;
pub mod session;
pub mod urlsync;

pub use clients::{BoundaryCatalog, BoundaryClient, GeocodeClient, ListingClient, SuggestDebouncer, SuggestProvider};
pub use config::Config;
pub use error::{Error, Result};
pub use filters::{FilterState, FilterStore};
pub use models::{
    BoundaryNode, NearPoint, PlaceKind, RentType, SearchFilter, SearchPaging, SearchRequest,
    SearchResponse, Suggestion, Tenement,
};
pub use query::{build_request, repage};
pub use session::SearchSession;
