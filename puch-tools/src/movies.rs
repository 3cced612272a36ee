//! Movie booking handoff.
//!
//! There is no showtime feed behind these tools. They resolve the user's city
//! and hand back BookMyShow and Paytm Movies deep links, optionally wrapped
//! for affiliate tracking, plus a shareable text card.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use puch_core::types::ResolvedCity;
use puch_geo::{find_city, GeoResolver, POPULAR_CITIES};

use crate::links::{quote, Affiliate};
use crate::prefs::PrefsStore;

const BMS_HOME: &str = "https://in.bookmyshow.com/";
const PAYTM_MOVIES: &str = "https://paytm.com/movies";
const MAX_CARD_SHOWTIMES: usize = 6;
const MAX_CARD_TIMES: usize = 6;

// ═══════════════════════════════════════════════════════════════════════════════
// PAYLOAD TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a booking link points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingSource {
    /// in.bookmyshow.com
    Bookmyshow,
    /// paytm.com/movies
    Paytm,
    /// Anything a caller passed back that we do not recognise
    #[serde(other)]
    Other,
}

/// One bookable entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowtimeItem {
    /// Theatre or link label
    pub theatre: String,
    /// Street address, when known
    #[serde(default)]
    pub address: Option<String>,
    /// Show times, when known
    #[serde(default)]
    pub times: Vec<String>,
    /// Booking URL
    pub booking_link: String,
    /// Booking platform
    #[serde(default)]
    pub source: Option<BookingSource>,
}

impl ShowtimeItem {
    fn link(theatre: impl Into<String>, booking_link: String, source: BookingSource) -> Self {
        Self {
            theatre: theatre.into(),
            address: Some(String::new()),
            times: Vec::new(),
            booking_link,
            source: Some(source),
        }
    }
}

/// Quick links for one popular city.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPickerEntry {
    /// Display name
    pub city: String,
    /// BookMyShow explore link
    pub bms: String,
    /// Paytm Movies link
    pub paytm: String,
}

/// Inputs shared by `fetch_showtimes` and `quick_book`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShowtimesQuery {
    /// Free-text city
    pub city: Option<String>,
    /// Movie to search for; browse everything when absent
    pub movie_title: Option<String>,
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
    /// Latitude of the user
    pub lat: Option<f64>,
    /// Longitude of the user
    pub lon: Option<f64>,
}

/// Booking links for a city, or a city picker when none resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShowtimesPayload {
    /// Heading for the card
    pub movie: String,
    /// Show date
    pub date: String,
    /// Booking entries
    pub showtimes: Vec<ShowtimeItem>,
    /// Popular cities to choose from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_picker: Option<Vec<CityPickerEntry>>,
}

/// Inputs for a share card.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BookingCard {
    /// Show date
    pub date: String,
    /// Entries, usually straight from [`ShowtimesPayload`]
    pub showtimes: Vec<ShowtimeItem>,
    /// City label
    #[serde(default)]
    pub city: Option<String>,
    /// Movie title
    #[serde(default)]
    pub movie_title: Option<String>,
    /// Trailer link
    #[serde(default)]
    pub trailer_url: Option<String>,
    /// City picker, passed through from [`ShowtimesPayload`]
    #[serde(default)]
    pub city_picker: Option<Vec<CityPickerEntry>>,
}

/// A where-to-watch search link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OttLink {
    /// Platform name
    pub name: &'static str,
    /// Search URL
    pub url: String,
}

/// Where-to-watch result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OttLinks {
    /// Search links, one per platform
    pub links: Vec<OttLink>,
    /// Set when the request could not be served
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Movie suggestions. Always empty: booking links carry the live listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MovieSuggestions {
    /// Suggested titles
    pub movies: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOOLS
// ═══════════════════════════════════════════════════════════════════════════════

/// Booking link builder bound to a geo resolver.
pub struct MovieTools {
    resolver: Arc<GeoResolver>,
    affiliate: Affiliate,
    prefs: Option<Arc<PrefsStore>>,
}

impl MovieTools {
    /// Creates the tools with no affiliate wrapping and no saved preferences.
    pub fn new(resolver: Arc<GeoResolver>) -> Self {
        Self {
            resolver,
            affiliate: Affiliate::default(),
            prefs: None,
        }
    }

    /// Wraps every booking link with `affiliate`.
    pub fn with_affiliate(mut self, affiliate: Affiliate) -> Self {
        self.affiliate = affiliate;
        self
    }

    /// Falls back to the saved preferred city when a query has no location.
    pub fn with_prefs(mut self, prefs: Arc<PrefsStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Light movie ideas. Intentionally empty.
    pub fn recommend_movies(&self, _limit: u32) -> MovieSuggestions {
        MovieSuggestions::default()
    }

    /// Resolves the user's city and returns booking links.
    ///
    /// A known city yields two city-scoped links. Anything else yields the
    /// BookMyShow home page, Paytm Movies and a picker of popular cities.
    #[instrument(skip(self))]
    pub async fn fetch_showtimes(&self, query: &ShowtimesQuery) -> ShowtimesPayload {
        let movie_title = non_blank(query.movie_title.as_deref());
        let date = query.date.clone().unwrap_or_else(today);

        let mut city = non_blank(query.city.as_deref()).map(str::to_string);
        if city.is_none() && query.lat.is_none() && query.lon.is_none() {
            if let Some(prefs) = &self.prefs {
                city = prefs.preferred_city().await;
                debug!(?city, "Using preferred city");
            }
        }

        let resolved = self
            .resolver
            .resolve_location(city.as_deref(), query.lat, query.lon)
            .await;

        let movie = match (movie_title, &resolved) {
            (Some(title), _) => title.to_string(),
            (None, Some(city)) => format!("Now Showing in {}", city.display_name),
            (None, None) => "Now Showing".to_string(),
        };

        let paytm = self.paytm_link(movie_title);

        match resolved {
            Some(ResolvedCity {
                display_name,
                slug: Some(slug),
            }) => ShowtimesPayload {
                movie,
                date,
                showtimes: vec![
                    ShowtimeItem::link(
                        format!("All theatres in {display_name}"),
                        self.bms_city_link(&slug, movie_title),
                        BookingSource::Bookmyshow,
                    ),
                    ShowtimeItem::link("Paytm Movies", paytm, BookingSource::Paytm),
                ],
                city_picker: None,
            },
            _ => ShowtimesPayload {
                movie,
                date,
                showtimes: vec![
                    ShowtimeItem::link(
                        "Book on BookMyShow (choose your city in-site)",
                        self.affiliate.wrap(BMS_HOME),
                        BookingSource::Bookmyshow,
                    ),
                    ShowtimeItem::link(
                        "Book on Paytm Movies (choose city in-site)",
                        paytm,
                        BookingSource::Paytm,
                    ),
                ],
                city_picker: Some(city_picker()),
            },
        }
    }

    /// Same as [`fetch_showtimes`](Self::fetch_showtimes); the one-tap entry point.
    pub async fn quick_book(&self, query: &ShowtimesQuery) -> ShowtimesPayload {
        self.fetch_showtimes(query).await
    }

    fn bms_city_link(&self, slug: &str, movie_title: Option<&str>) -> String {
        let url = match movie_title {
            Some(title) => format!(
                "https://in.bookmyshow.com/explore/c/{slug}?q={}",
                quote(title)
            ),
            None => bms_explore(slug),
        };
        self.affiliate.wrap(&url)
    }

    fn paytm_link(&self, movie_title: Option<&str>) -> String {
        let url = match movie_title {
            Some(title) => format!("{PAYTM_MOVIES}?q={}", quote(title)),
            None => PAYTM_MOVIES.to_string(),
        };
        self.affiliate.wrap(&url)
    }
}

fn bms_explore(slug: &str) -> String {
    format!("https://in.bookmyshow.com/explore/movies-{slug}")
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Quick links for the popular cities.
pub fn city_picker() -> Vec<CityPickerEntry> {
    POPULAR_CITIES
        .iter()
        .filter_map(|slug| find_city(slug))
        .map(|record| CityPickerEntry {
            city: record.canonical_name.to_string(),
            bms: bms_explore(record.slug),
            paytm: PAYTM_MOVIES.to_string(),
        })
        .collect()
}

/// Renders a WhatsApp-friendly booking card.
pub fn generate_booking_card(card: &BookingCard) -> String {
    let city = non_blank(card.city.as_deref());
    let movie = match (non_blank(card.movie_title.as_deref()), city) {
        (Some(title), _) => title.to_string(),
        (None, Some(city)) => format!("Now Showing in {city}"),
        (None, None) => "Now Showing".to_string(),
    };

    let mut lines = vec![format!(
        "🎬 *{movie}* — {} ({})",
        city.unwrap_or("Nearby"),
        card.date
    )];

    for show in card.showtimes.iter().take(MAX_CARD_SHOWTIMES) {
        let theatre = if show.theatre.is_empty() {
            "Showtimes"
        } else {
            show.theatre.as_str()
        };
        let times = if show.times.is_empty() {
            "Showtimes →".to_string()
        } else {
            show.times
                .iter()
                .take(MAX_CARD_TIMES)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let prefix = match show.source {
            Some(BookingSource::Paytm) => "• (Paytm)",
            Some(BookingSource::Bookmyshow) => "• (BMS)",
            _ => "•",
        };
        lines.push(format!("{prefix} {theatre}: {times}\n  Book: {}", show.booking_link));
    }

    if let Some(trailer) = non_blank(card.trailer_url.as_deref()) {
        lines.push(format!("Trailer: {trailer}"));
    }

    if let Some(picker) = card.city_picker.as_ref().filter(|p| !p.is_empty()) {
        lines.push("📍 Quick city links:".to_string());
        for entry in picker {
            lines.push(format!("• {}:", entry.city));
            lines.push(format!("  BMS: {}", entry.bms));
            lines.push(format!("  Paytm: {}", entry.paytm));
        }
        lines.push(
            "Tip: Share your live location to auto-detect the city next time, or run: set_preferred_city."
                .to_string(),
        );
    }

    lines.push("↪️ Forward this in your group to pick a show.".to_string());
    lines.join("\n")
}

/// Search links for a title across streaming platforms.
pub fn ott_where_to_watch(title: &str) -> OttLinks {
    let title = title.trim();
    if title.is_empty() {
        return OttLinks {
            links: Vec::new(),
            hint: Some("Please provide a title.".into()),
        };
    }

    let q = quote(title);
    let smart = quote(&format!(
        "{title} watch online site:netflix.com OR site:primevideo.com OR site:hotstar.com OR site:jiocinema.com OR site:sonyliv.com"
    ));

    OttLinks {
        links: vec![
            OttLink { name: "Netflix", url: format!("https://www.netflix.com/search?q={q}") },
            OttLink { name: "Prime Video", url: format!("https://www.primevideo.com/search?phrase={q}") },
            OttLink { name: "Disney+ Hotstar", url: format!("https://www.hotstar.com/in/search?q={q}") },
            OttLink { name: "JioCinema", url: format!("https://www.jiocinema.com/search/{q}") },
            OttLink { name: "Sony LIV", url: format!("https://www.sonyliv.com/search/{q}") },
            OttLink {
                name: "YouTube Movies",
                url: format!(
                    "https://www.youtube.com/results?search_query={}",
                    quote(&format!("{title} full movie"))
                ),
            },
            OttLink { name: "Smart Search", url: format!("https://www.google.com/search?q={smart}") },
        ],
        hint: None,
    }
}
