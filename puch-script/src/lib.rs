//! # Puch Script
//!
//! Classifies free text by the Unicode script most of its letters belong to.
//!
//! Music search uses the label to push tracks written in the listener's
//! script (Devanagari, Tamil, Gurmukhi, ...) ahead of everything else.
//!
//! ## Example
//!
//! ```rust
//! use puch_script::{dominant_script, script_matcher, ScriptLabel};
//!
//! let label = dominant_script(Some("नमस्ते"));
//! assert_eq!(label.to_string(), "DEVANAGARI");
//!
//! let is_latin = script_matcher(ScriptLabel::LATIN);
//! assert!(is_latin("hello"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod detect;
mod label;

pub use detect::{dominant_script, script_matcher};
pub use label::ScriptLabel;
