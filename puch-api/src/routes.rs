//! API route configuration.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_bearer;
use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
///
/// `/health` is open; everything under `/tools` requires the bearer token.
pub fn create_router(state: Arc<AppState>) -> Router {
    let tools = Router::new()
        .route("/tools", get(handlers::list_tools))
        .route("/tools/validate", post(handlers::validate))
        // Preferences
        .route("/tools/set_preferred_city", post(handlers::set_preferred_city))
        .route("/tools/get_preferred_city", post(handlers::get_preferred_city))
        // Movies
        .route("/tools/recommend_movies", post(handlers::recommend_movies))
        .route("/tools/fetch_showtimes", post(handlers::fetch_showtimes))
        .route("/tools/quick_book", post(handlers::quick_book))
        .route("/tools/generate_booking_card", post(handlers::generate_booking_card))
        .route("/tools/ott_where_to_watch", post(handlers::ott_where_to_watch))
        // Music
        .route(
            "/tools/music_vibe_recommendations",
            post(handlers::music_recommendations),
        )
        .route("/tools/music", post(handlers::music_recommendations))
        // Weather & news
        .route("/tools/weather_now", post(handlers::weather_now))
        .route("/tools/weather_forecast", post(handlers::weather_forecast))
        .route("/tools/trending_topics", post(handlers::trending_topics))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(tools)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::state::{AdapterConfigs, ApiConfig};

    const TOKEN: &str = "secret-token";

    struct TestApp {
        router: Router,
        _dir: TempDir,
    }

    fn test_app_with(adapters: AdapterConfigs) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ApiConfig::new(TOKEN, "919876543210");
        config.prefs_path = dir.path().join("prefs.json");

        let state = Arc::new(AppState::with_adapters(config, adapters).unwrap());
        TestApp {
            router: create_router(state),
            _dir: dir,
        }
    }

    fn test_app() -> TestApp {
        // Point geocoding at a closed port so nothing leaves the machine.
        let mut adapters = AdapterConfigs::default();
        adapters.nominatim.base_url = "http://127.0.0.1:9".into();
        test_app_with(adapters)
    }

    fn tool_call(name: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/tools/{name}"))
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn call(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_health_check_is_open() {
        let app = test_app();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_tools_require_token() {
        let app = test_app();

        let missing = Request::builder()
            .method("POST")
            .uri("/tools/validate")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, missing).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let wrong = Request::builder()
            .method("POST")
            .uri("/tools/validate")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&app, wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validate_and_listing() {
        let app = test_app();

        let (status, body) = call(&app, tool_call("validate", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("919876543210"));

        let listing = Request::builder()
            .uri("/tools")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, listing).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert!(names.contains(&"quick_book"));
        assert!(names.contains(&"music"));
    }

    #[tokio::test]
    async fn test_preferred_city_round_trip() {
        let app = test_app();

        let (_, body) = call(&app, tool_call("get_preferred_city", json!({}))).await;
        assert_eq!(body, json!({ "city": null }));

        let (status, body) = call(&app, tool_call("set_preferred_city", json!({ "city": " Pune " }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Saved preferred city as Pune.");

        let (_, body) = call(&app, tool_call("get_preferred_city", json!({}))).await;
        assert_eq!(body, json!({ "city": "Pune" }));

        // The saved city feeds booking when nothing else is given.
        let (_, body) = call(&app, tool_call("quick_book", json!({}))).await;
        assert_eq!(body["movie"], "Now Showing in Pune");
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected() {
        let app = test_app();
        let (status, body) = call(&app, tool_call("set_preferred_city", json!({ "city": "  " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "Please provide a city.");
    }

    #[tokio::test]
    async fn test_fetch_showtimes_known_city() {
        let app = test_app();
        let args = json!({ "city": "bombay", "movie_title": "Jawan", "date": "2024-05-01" });

        let (status, body) = call(&app, tool_call("fetch_showtimes", args)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movie"], "Jawan");
        assert_eq!(body["date"], "2024-05-01");
        assert_eq!(body["showtimes"][0]["theatre"], "All theatres in Mumbai");
        assert_eq!(
            body["showtimes"][0]["booking_link"],
            "https://in.bookmyshow.com/explore/c/mumbai?q=Jawan"
        );
        assert!(body.get("city_picker").is_none());
    }

    #[tokio::test]
    async fn test_fetch_showtimes_bad_radius() {
        let app = test_app();
        let (status, _) = call(&app, tool_call("fetch_showtimes", json!({ "radius_km": 0 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let app = test_app();
        let (status, body) = call(&app, tool_call("quick_book", json!({ "town": "Pune" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_booking_card_from_showtimes() {
        let app = test_app();
        let (_, payload) = call(
            &app,
            tool_call("fetch_showtimes", json!({ "city": "Chennai", "date": "2024-05-01" })),
        )
        .await;

        let mut card = payload.clone();
        card["city"] = json!("Chennai");
        card["movie_title"] = payload["movie"].clone();

        let (status, body) = call(&app, tool_call("generate_booking_card", card)).await;
        assert_eq!(status, StatusCode::OK);
        let text = body["share_text"].as_str().unwrap();
        assert!(text.contains("Chennai (2024-05-01)"));
        assert!(text.ends_with("↪️ Forward this in your group to pick a show."));
    }

    #[tokio::test]
    async fn test_ott_links() {
        let app = test_app();
        let (status, body) = call(&app, tool_call("ott_where_to_watch", json!({ "title": "Dune" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["links"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_music_without_credentials() {
        let app = test_app();
        let (status, body) = call(&app, tool_call("music", json!({ "vibe": "chill" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("SPOTIFY_CLIENT_ID"));

        let (status, _) = call(&app, tool_call("music", json!({ "vibe": "chill", "limit": 99 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_weather_needs_location() {
        let app = test_app();
        let (status, body) = call(&app, tool_call("weather_now", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["message"],
            "Please provide a city or share location."
        );
    }

    #[tokio::test]
    async fn test_trending_topics() {
        let server = MockServer::start().await;
        let rss = r#"<rss><channel>
            <item><title>Top stories</title><link>https://news.example/top</link></item>
            <item><title>Monsoon arrives early</title><link>https://news.example/1</link></item>
        </channel></rss>"#;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss))
            .mount(&server)
            .await;

        let mut adapters = AdapterConfigs::default();
        adapters.news.feed_url = format!("{}/rss", server.uri());
        let app = test_app_with(adapters);

        let (status, body) = call(&app, tool_call("trending_topics", json!({ "region": "in" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "IN");
        assert_eq!(body["topics"][0]["title"], "Monsoon arrives early");
        assert_eq!(body["topics"].as_array().unwrap().len(), 1);
    }
}
