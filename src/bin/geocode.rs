use bike_planner::config::TimeoutConfig;
use bike_planner::geocoding::{NominatimClient, NOMINATIM_URL};
use clap::Parser;

#[derive(Parser)]
#[command(name = "geocode")]
#[command(about = "Resolve a place name to coordinates for the route planner", long_about = None)]
struct Cli {
    /// Geocoder base URL (Nominatim-compatible)
    #[arg(short, long, default_value = NOMINATIM_URL)]
    url: String,

    /// Give up on the geocoder after this many seconds
    #[arg(short, long, default_value_t = 15)]
    timeout: u64,

    /// Place to look up, e.g. "Nyhavn, Copenhagen"
    #[arg(required = true)]
    location: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let query = cli.location.join(" ");

    let timeouts = TimeoutConfig {
        upstream_secs: cli.timeout,
        ..TimeoutConfig::default()
    };
    let client = NominatimClient::with_timeouts(&cli.url, &timeouts, true)?;
    let place = client
        .search(&query)
        .await?
        .ok_or_else(|| format!("No location found for {query:?}"))?;

    println!("{}", place.display_name);
    println!("Longitude = {}", place.lon);
    println!("Latitude = {}", place.lat);
    println!("{}", place.lon_lat());
    Ok(())
}
