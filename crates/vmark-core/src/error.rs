#![forbid(unsafe_code)]

//! Setup-time errors.
//!
//! Validation failures are never errors: they travel as
//! [`ValidationEvent`](crate::ValidationEvent)s with `is_valid == false`.
//! The types here cover misconfiguration only, which is fatal for the scope
//! being built and is reported before any field is evaluated.

use std::fmt;

/// A configuration error raised while building a marker map or a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A preset tag did not name any known preset.
    UnknownPreset(String),
    /// `class_name_invalid` was missing or blank.
    MissingClassNameInvalid,
    /// A component id was supplied but empty.
    EmptyComponentId,
    /// A declarative attribute was not recognised.
    UnknownAttribute(String),
    /// An option or attribute was present but its value could not be used.
    InvalidValue {
        /// Option or attribute name.
        field: String,
        /// The offending value.
        value: String,
        /// What was expected instead.
        message: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPreset(tag) => write!(f, "unknown validation preset: {tag:?}"),
            Self::MissingClassNameInvalid => {
                write!(f, "class_name_invalid is required and must not be blank")
            }
            Self::EmptyComponentId => write!(f, "component id must not be empty"),
            Self::UnknownAttribute(name) => write!(f, "unknown validator attribute: {name:?}"),
            Self::InvalidValue {
                field,
                value,
                message,
            } => write!(f, "{field}={value} ({message})"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result alias for setup-time operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
