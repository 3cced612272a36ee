//! Puch CLI
//!
//! Runs the tool server and pokes at its building blocks from a terminal.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use puch_api::{ApiConfig, ApiServer, DEFAULT_PORT};
use puch_core::constants::DEFAULT_NEAREST_CITY_KM;
use puch_geo::{nearest_city_with_distance, normalize_city};
use puch_script::dominant_script;
use puch_tools::{NewsClient, NominatimClient, WeatherClient, WeatherConfig};

/// Puch - WhatsApp tool server for movies, music, weather and news
#[derive(Parser)]
#[command(name = "puch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Normalize a city name
    City {
        /// Free-text city, e.g. "bombay"
        text: String,
    },

    /// Find the nearest known city to a coordinate
    Nearest {
        /// Latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Snap radius in kilometres
        #[arg(long, default_value_t = DEFAULT_NEAREST_CITY_KM)]
        max_km: f64,
    },

    /// Detect the dominant writing system of a text
    Script {
        /// Text to inspect
        text: String,
    },

    /// Current weather and 3-day forecast for a city
    Weather {
        /// City name
        city: String,
    },

    /// Trending headlines
    Trending {
        /// Items to return (1-20)
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "puch=debug,info"
    } else {
        "puch=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::City { text } => cmd_city(&text),
        Commands::Nearest { lat, lon, max_km } => cmd_nearest(lat, lon, max_km),
        Commands::Script { text } => cmd_script(&text),
        Commands::Weather { city } => cmd_weather(&city).await,
        Commands::Trending { limit } => cmd_trending(limit).await,
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let mut config = ApiConfig::from_env().context("Failed to load configuration")?;
    config.port = port;

    println!("{}", "🚀 Starting Puch tool server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("   {} {}", "Preferences:".dimmed(), config.prefs_path.display());
    if config.spotify_client_id.is_none() || config.spotify_client_secret.is_none() {
        println!(
            "   {} music tools need SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET",
            "Note:".yellow()
        );
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to build server state")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address: {bind}"))?;
    server.run(addr).await?;

    Ok(())
}

/// Normalize a city name
fn cmd_city(text: &str) -> Result<()> {
    match normalize_city(Some(text)) {
        Some(city) => {
            println!("{} {}", "City:".green().bold(), city.display_name);
            match city.slug {
                Some(slug) => println!("{} {}", "Slug:".dimmed(), slug),
                None => println!("{}", "Not a known BookMyShow city".yellow()),
            }
        }
        None => println!("{}", "No city given".yellow()),
    }
    Ok(())
}

/// Find the nearest known city
fn cmd_nearest(lat: f64, lon: f64, max_km: f64) -> Result<()> {
    let (record, distance) = nearest_city_with_distance(lat, lon).context("City table is empty")?;
    debug!(slug = record.slug, distance, "Nearest city");

    if distance <= max_km {
        println!(
            "{} {} ({:.1} km)",
            "Nearest:".green().bold(),
            record.canonical_name,
            distance
        );
    } else {
        println!(
            "{} closest is {} at {:.1} km, beyond {:.0} km",
            "No known city in range:".yellow(),
            record.canonical_name,
            distance,
            max_km
        );
    }
    Ok(())
}

/// Detect the dominant script
fn cmd_script(text: &str) -> Result<()> {
    println!("{} {}", "Script:".green().bold(), dominant_script(Some(text)));
    Ok(())
}

/// Current weather and forecast
async fn cmd_weather(city: &str) -> Result<()> {
    println!("{} {}", "🌤  Weather for".cyan().bold(), city);

    let geocoder = Arc::new(NominatimClient::new()?);
    let client = WeatherClient::with_config(WeatherConfig::default(), geocoder)?;

    let now = client
        .current(Some(city), None, None)
        .await
        .context("Failed to fetch current weather")?;
    println!("\n{} {}", "Where:".dimmed(), now.place);
    println!("{}", serde_json::to_string_pretty(&now.current)?);

    let forecast = client
        .daily(Some(city), None, None)
        .await
        .context("Failed to fetch forecast")?;
    println!("\n{}", "Forecast:".green());
    println!("{}", serde_json::to_string_pretty(&forecast.daily)?);

    Ok(())
}

/// Trending headlines
async fn cmd_trending(limit: u32) -> Result<()> {
    let client = NewsClient::new()?;
    let response = client
        .trending("IN", limit)
        .await
        .context("Failed to fetch headlines")?;

    println!("{} {}", "📰 Trending in".cyan().bold(), response.region);
    for (i, topic) in response.topics.iter().enumerate() {
        println!("\n{:>2}. {}", i + 1, topic.title.bold());
        println!("    {}", topic.link.dimmed());
    }

    Ok(())
}
