pub mod boundary;
pub mod geocode;
pub mod listing;

pub use boundary::{BoundaryCatalog, BoundaryClient};
pub use geocode::{GeocodeClient, SuggestDebouncer, SuggestProvider};
pub use listing::ListingClient;

use std::time::Duration;

use crate::error::Result;

/// Request timeout shared by all service clients.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn build_http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}
