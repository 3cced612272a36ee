//! # Puch API Server
//!
//! HTTP surface for the Puch tools. Every tool is a JSON `POST` under
//! `/tools/`, guarded by a static bearer token.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and uptime (open)
//! - `GET /tools` - Tool catalog with descriptions
//! - `POST /tools/validate` - Owner's phone number
//! - `POST /tools/{set,get}_preferred_city` - Preferred city
//! - `POST /tools/fetch_showtimes`, `/tools/quick_book` - Booking links
//! - `POST /tools/generate_booking_card` - Shareable card text
//! - `POST /tools/ott_where_to_watch` - Streaming search links
//! - `POST /tools/music_vibe_recommendations`, `/tools/music` - Spotify picks
//! - `POST /tools/weather_now`, `/tools/weather_forecast` - Open-Meteo
//! - `POST /tools/trending_topics` - News headlines
//!
//! ## Example
//!
//! ```rust,ignore
//! use puch_api::{ApiConfig, ApiServer};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 8086)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod auth;
mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::TOOLS;
pub use dto::ToolInfo;
pub use routes::create_router;
pub use state::{AdapterConfigs, ApiConfig, AppState, DEFAULT_PORT};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use puch_core::error::Result;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for the Puch tools.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_state(AppState::new(config)?))
    }

    /// Creates a server around prepared state.
    pub fn with_state(state: AppState) -> Self {
        handlers::mark_started();
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            %addr,
            tools = TOOLS.len(),
            "Puch API server listening"
        );

        axum::serve(listener, self.router()).await
    }
}
