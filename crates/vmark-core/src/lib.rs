#![forbid(unsafe_code)]

//! Core: validation presets, validation events, and the marker map that
//! aggregates per-field validity for a form.
//!
//! # Example
//!
//! ```rust
//! use vmark_core::{evaluate, MarkerMap, MarkerMapOptions, ValidationPreset};
//!
//! let mut map = MarkerMap::new(MarkerMapOptions::new("err").class_name_valid("ok")).unwrap();
//!
//! map.set("year", &evaluate(ValidationPreset::Year, "2024"));
//! map.set("id", &evaluate(ValidationPreset::Guid, "not-a-guid"));
//!
//! assert_eq!(map.get("year"), Some("ok"));
//! assert_eq!(map.get("id"), Some("err"));
//! assert!(!map.validate_all());
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod marker_map;
pub mod preset;
pub mod rules;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

pub use config::{ENV_CLASS_INVALID, ENV_CLASS_VALID, MarkerMapOptions, MarkerMapOptionsParse};
pub use error::{ConfigError, ConfigResult};
pub use event::{RawValue, ValidationEvent};
pub use marker_map::{
    ChangeCallback, MarkerChange, MarkerCounts, MarkerListener, MarkerMap, MarkerStatus,
    SharedMarkerMap, SubscriptionId,
};
pub use preset::ValidationPreset;
pub use rules::{YEAR_MAX, YEAR_MIN, check, evaluate};
