#![forbid(unsafe_code)]

//! Component installation.
//!
//! Hosts expose a [`ComponentRegistry`]; [`install`] registers the validator
//! factory under [`VALIDATOR_TAG`] so templates can instantiate it by tag.
//! [`Registry`] is a ready-made in-memory registry for hosts that do not
//! have their own.

use std::collections::HashMap;
use std::fmt;

use vmark_core::{ConfigError, ConfigResult};

use crate::validator::{Validator, ValidatorOptions};

/// Tag the validator component is registered under.
pub const VALIDATOR_TAG: &str = "validator";

/// Builds a component instance from its options.
pub type ComponentFactory = fn(ValidatorOptions) -> ConfigResult<Validator>;

// ---------------------------------------------------------------------------
// InstallError
// ---------------------------------------------------------------------------

/// Errors raised while installing or instantiating components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// A factory is already registered under this tag.
    DuplicateTag(String),
    /// No factory is registered under this tag.
    UnknownTag(String),
    /// The factory rejected its options.
    Config(ConfigError),
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag(tag) => write!(f, "component tag already registered: {tag:?}"),
            Self::UnknownTag(tag) => write!(f, "no component registered for tag: {tag:?}"),
            Self::Config(err) => write!(f, "component configuration error: {err}"),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::DuplicateTag(_) | Self::UnknownTag(_) => None,
        }
    }
}

impl From<ConfigError> for InstallError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ---------------------------------------------------------------------------
// ComponentRegistry
// ---------------------------------------------------------------------------

/// The host's component registration surface.
pub trait ComponentRegistry {
    /// Register `factory` under `tag`.
    ///
    /// Implementations must refuse a tag that is already taken rather than
    /// replacing the existing factory.
    fn register_component(
        &mut self,
        tag: &str,
        factory: ComponentFactory,
    ) -> Result<(), InstallError>;
}

/// Register the validator component under [`VALIDATOR_TAG`].
pub fn install<R: ComponentRegistry + ?Sized>(registry: &mut R) -> Result<(), InstallError> {
    registry.register_component(VALIDATOR_TAG, Validator::new)?;
    vmark_core::debug!(tag = VALIDATOR_TAG, "validator component installed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// In-memory [`ComponentRegistry`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    factories: HashMap<String, ComponentFactory>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a factory is registered under `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Build a component registered under `tag`.
    pub fn instantiate(
        &self,
        tag: &str,
        options: ValidatorOptions,
    ) -> Result<Validator, InstallError> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| InstallError::UnknownTag(tag.to_string()))?;
        Ok(factory(options)?)
    }

    /// Build a component from declarative template attributes.
    pub fn instantiate_from_attributes<I, K, V>(
        &self,
        tag: &str,
        attributes: I,
    ) -> Result<Validator, InstallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.instantiate(tag, ValidatorOptions::from_attributes(attributes)?)
    }
}

impl ComponentRegistry for Registry {
    fn register_component(
        &mut self,
        tag: &str,
        factory: ComponentFactory,
    ) -> Result<(), InstallError> {
        if self.factories.contains_key(tag) {
            vmark_core::warn!(tag, "component tag already registered");
            return Err(InstallError::DuplicateTag(tag.to_string()));
        }
        self.factories.insert(tag.to_string(), factory);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmark_core::ValidationPreset;

    #[test]
    fn install_registers_validator_tag() {
        let mut registry = Registry::new();
        install(&mut registry).unwrap();
        assert!(registry.contains(VALIDATOR_TAG));
        assert_eq!(registry.tags(), vec!["validator"]);
    }

    #[test]
    fn install_twice_is_an_error() {
        let mut registry = Registry::new();
        install(&mut registry).unwrap();
        assert_eq!(
            install(&mut registry).unwrap_err(),
            InstallError::DuplicateTag("validator".into())
        );
    }

    #[test]
    fn instantiate_unknown_tag() {
        let registry = Registry::new();
        let err = registry
            .instantiate("validator", ValidatorOptions::new(ValidationPreset::Year))
            .unwrap_err();
        assert_eq!(err, InstallError::UnknownTag("validator".into()));
    }

    #[test]
    fn instantiate_passes_config_errors_through() {
        let mut registry = Registry::new();
        install(&mut registry).unwrap();
        let err = registry
            .instantiate_from_attributes(VALIDATOR_TAG, [("preset", "Phone")])
            .unwrap_err();
        assert_eq!(
            err,
            InstallError::Config(ConfigError::UnknownPreset("Phone".into()))
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn instantiate_builds_validator() {
        let mut registry = Registry::new();
        install(&mut registry).unwrap();
        let mut validator = registry
            .instantiate_from_attributes(VALIDATOR_TAG, [("preset", "Year"), ("value", "1999")])
            .unwrap();
        assert!(validator.mount().is_valid());
    }
}
