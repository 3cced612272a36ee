//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use puch_core::constants::USER_AGENT;
use puch_core::error::{PuchError, Result};

/// Builds a client with the given timeout and the crate user agent.
pub(crate) fn build_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PuchError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Maps a transport failure onto the error taxonomy.
pub(crate) fn transport_error(service: &str, err: reqwest::Error) -> PuchError {
    if err.is_timeout() {
        PuchError::Timeout(service.to_string())
    } else if err.is_decode() {
        PuchError::Parse(format!("{service}: {err}"))
    } else {
        PuchError::Http(format!("{service}: {err}"))
    }
}

/// Fails unless the response carries a 2xx status.
pub(crate) fn ensure_success(service: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PuchError::upstream(service, format!("HTTP {status}")))
    }
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
