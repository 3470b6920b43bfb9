#![forbid(unsafe_code)]

//! Form scope: owns the marker map for a group of validators.
//!
//! The scope is what a page or dialog creates when it is set up and drops
//! when it is torn down. Validators created through it share its marker map;
//! the submit handler asks the scope whether everything is valid.

use vmark_core::{
    ConfigResult, MarkerMapOptions, MarkerStatus, RawValue, SharedMarkerMap, ValidationEvent,
    ValidationPreset,
};

use crate::validator::{Validator, ValidatorOptions};

/// Outcome of [`FormScope::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every reported field is valid.
    Accepted,
    /// These fields (sorted) failed their last evaluation.
    Rejected(Vec<String>),
}

impl SubmitOutcome {
    /// Returns `true` for [`SubmitOutcome::Accepted`].
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A validation scope for one form.
#[derive(Debug, Clone)]
pub struct FormScope {
    map: SharedMarkerMap,
}

impl FormScope {
    /// Create a scope with its own marker map.
    pub fn new(options: MarkerMapOptions) -> ConfigResult<Self> {
        Ok(Self {
            map: SharedMarkerMap::from_options(options)?,
        })
    }

    /// Create a scope whose marker map forwards every event to `on_changed`.
    pub fn with_on_changed(
        options: MarkerMapOptions,
        on_changed: impl FnMut(&ValidationEvent) + Send + 'static,
    ) -> ConfigResult<Self> {
        let map = vmark_core::MarkerMap::new(options)?.with_on_changed(on_changed);
        Ok(Self {
            map: SharedMarkerMap::new(map),
        })
    }

    /// The scope's marker map.
    #[must_use]
    pub fn marker_map(&self) -> &SharedMarkerMap {
        &self.map
    }

    /// A validator bound to this scope with an allocated id.
    pub fn validator(
        &self,
        preset: ValidationPreset,
        value: impl Into<RawValue>,
    ) -> ConfigResult<Validator> {
        Validator::new(
            ValidatorOptions::new(preset)
                .value(value)
                .marker_map(self.map.clone()),
        )
    }

    /// A validator bound to this scope under a caller-chosen id.
    pub fn validator_with_id(
        &self,
        component_id: impl Into<String>,
        preset: ValidationPreset,
        value: impl Into<RawValue>,
    ) -> ConfigResult<Validator> {
        Validator::new(
            ValidatorOptions::new(preset)
                .value(value)
                .marker_map(self.map.clone())
                .component_id(component_id),
        )
    }

    /// Attach this scope's marker map to externally built options.
    #[must_use]
    pub fn bind(&self, options: ValidatorOptions) -> ValidatorOptions {
        options.marker_map(self.map.clone())
    }

    /// Whether every field that has reported is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.map.validate_all()
    }

    /// Status of one field.
    #[must_use]
    pub fn status(&self, component_id: &str) -> MarkerStatus {
        self.map.status(component_id)
    }

    /// Check the whole form at submit time.
    ///
    /// Fields that never reported are not counted; mount validators before
    /// submitting if untouched fields must block the form.
    #[must_use]
    pub fn submit(&self) -> SubmitOutcome {
        let invalid = self.map.invalid_ids();
        let outcome = if invalid.is_empty() {
            SubmitOutcome::Accepted
        } else {
            SubmitOutcome::Rejected(invalid)
        };
        vmark_core::debug!(accepted = outcome.is_accepted(), "form submit");
        outcome
    }
}
