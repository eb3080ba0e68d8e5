use flatfinder::{
    BoundaryCatalog, BoundaryClient, Config, FilterStore, ListingClient, SearchSession,
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 flatfinder - listing search");
    info!("==============================");

    let config = Config::default();

    // An optional query-string argument deep-links into a filter selection,
    // e.g. "type=2,3&rentType=buy&rent=500-1200".
    let seed = std::env::args().nth(1).unwrap_or_default();
    let filters = FilterStore::new(SearchSession::seed_from_query(&seed));

    let boundary_client = BoundaryClient::new(&config)?;
    let catalog = BoundaryCatalog::load(&boundary_client).await;
    if let Some(err) = &catalog.popular_error {
        warn!("popular boundaries unavailable: {err}");
    }
    if let Some(err) = &catalog.all_error {
        warn!("full boundary set unavailable: {err}");
    }

    let state = filters.get();
    let selected = catalog.selected(&state.within_id);
    if !selected.is_empty() {
        let names: Vec<&str> = selected.iter().map(|b| b.display_name()).collect();
        info!("Searching within: {}", names.join(", "));
    }

    let mut session = SearchSession::new();
    let request = session.commit(&state);

    let listings = ListingClient::new(&config)?;
    let response = listings.search(&request).await?;
    let count = listings.count(&request.filter).await?;

    info!(
        "\n✅ {} of {} listings (page {})\n",
        response.res.len(),
        count.count,
        response.page
    );

    for (i, listing) in response.res.iter().enumerate() {
        println!(
            "{}. {} ({} EUR)",
            i + 1,
            listing.title,
            listing.rent
        );
        println!("   {} {} · {} m²", listing.zip, listing.city, listing.size);
        if let Some(address) = &listing.address {
            println!("   {address}");
        }
        println!("   ID: {}", listing.id);
        println!();
    }

    info!("Share this search: ?{}", session.query_string());

    Ok(())
}
