//! # Puch Core
//!
//! Shared building blocks for the Puch tool server crates:
//!
//! - **Types**: resolved cities, geographic points
//! - **Errors**: one error hierarchy for adapters and the API
//! - **Constants**: cache windows, timeouts, tool limits
//! - **Traits**: geocoding collaborators that the geo resolver and weather tools consume
//!
//! ## Example
//!
//! ```rust
//! use puch_core::{ResolvedCity, PuchError};
//!
//! let city = ResolvedCity::known("Mumbai", "mumbai");
//! assert!(city.is_known());
//! let err = PuchError::Validation("limit must be between 1 and 10".into());
//! assert!(err.is_validation_error());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{PuchError, Result};
pub use traits::*;
pub use types::*;
