#![forbid(unsafe_code)]

//! vmark public facade crate.
//!
//! Re-exports the validation rules, the marker map, and the validator
//! component, plus a prelude for form code.
//!
//! ```
//! use vmark::prelude::*;
//!
//! let form = FormScope::new(MarkerMapOptions::new("is-invalid")).unwrap();
//! let mut year = form.validator(ValidationPreset::Year, "1987").unwrap();
//! assert!(year.mount().is_valid());
//! assert!(form.is_valid());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use vmark_core::{
    ChangeCallback, ConfigError, MarkerChange, MarkerCounts, MarkerListener, MarkerMap,
    MarkerMapOptions, MarkerStatus, RawValue, SharedMarkerMap, SubscriptionId, ValidationEvent,
    ValidationPreset, YEAR_MAX, YEAR_MIN, check, evaluate,
};

// --- Widget re-exports -----------------------------------------------------

pub use vmark_widgets::{
    ComponentFactory, ComponentRegistry, FormScope, InstallError, Registry, SubmitOutcome,
    VALIDATOR_TAG, ValidateListener, Validator, ValidatorOptions, install,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for vmark hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid marker-map or validator configuration.
    Config(ConfigError),
    /// Component installation or instantiation failed.
    Install(InstallError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Install(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Install(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InstallError> for Error {
    fn from(err: InstallError) -> Self {
        Self::Install(err)
    }
}

/// Standard result type for vmark APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FormScope, MarkerMap, MarkerMapOptions, MarkerStatus, RawValue, Result,
        SharedMarkerMap, ValidationEvent, ValidationPreset, Validator, ValidatorOptions,
    };

    pub use crate::{core, widgets};
}

pub use vmark_core as core;
pub use vmark_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tag: &str) -> Result<Validator> {
        let mut registry = Registry::new();
        install(&mut registry)?;
        let options = ValidatorOptions::new(ValidationPreset::Guid);
        Ok(registry.instantiate(tag, options)?)
    }

    #[test]
    fn errors_convert_into_facade_error() {
        assert!(build(VALIDATOR_TAG).is_ok());
        let err = build("checkbox").unwrap_err();
        assert_eq!(err, Error::Install(InstallError::UnknownTag("checkbox".into())));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = MarkerMap::new(MarkerMapOptions::new("")).unwrap_err().into();
        assert!(matches!(err, Error::Config(ConfigError::MissingClassNameInvalid)));
    }
}
