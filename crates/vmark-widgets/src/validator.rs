#![forbid(unsafe_code)]

//! The validator component.
//!
//! A [`Validator`] wraps one input value. On every change of that value it:
//!
//! 1. evaluates its preset against the value,
//! 2. reports the event to the shared marker map under its component id,
//! 3. caches the map's style class for that id,
//! 4. hands the event to its own `on_validate` listeners.
//!
//! The order is fixed and each relevant change runs the sequence exactly
//! once. Validators without a marker map still evaluate and emit; they just
//! have no style class.
//!
//! # Example
//!
//! ```rust
//! use vmark_core::{MarkerMapOptions, SharedMarkerMap, ValidationPreset};
//! use vmark_widgets::{Validator, ValidatorOptions};
//!
//! let map = SharedMarkerMap::from_options(MarkerMapOptions::new("err").class_name_valid("ok")).unwrap();
//! let mut year = Validator::new(
//!     ValidatorOptions::new(ValidationPreset::Year)
//!         .marker_map(map.clone())
//!         .component_id("year"),
//! )
//! .unwrap();
//!
//! year.mount();
//! assert_eq!(year.class_name(), Some("err"));
//!
//! year.set_value("1984");
//! assert_eq!(year.class_name(), Some("ok"));
//! assert!(map.validate_all());
//! ```

use std::fmt;

use vmark_core::{
    ConfigError, ConfigResult, MarkerStatus, RawValue, SharedMarkerMap, ValidationEvent,
    ValidationPreset, evaluate,
};

/// Listener for events emitted by a [`Validator`].
pub type ValidateListener = Box<dyn FnMut(&ValidationEvent) + Send>;

// ---------------------------------------------------------------------------
// ValidatorOptions
// ---------------------------------------------------------------------------

/// Instance configuration for a [`Validator`].
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Initial bound value.
    pub value: RawValue,
    /// Rule applied on every evaluation.
    pub preset: ValidationPreset,
    /// Scope aggregator, if the validator takes part in one.
    pub marker_map: Option<SharedMarkerMap>,
    /// Identity inside `marker_map`. Allocated from the map when omitted.
    pub component_id: Option<String>,
}

impl ValidatorOptions {
    /// Options for `preset` with an empty value and no map.
    #[must_use]
    pub fn new(preset: ValidationPreset) -> Self {
        Self {
            value: RawValue::Empty,
            preset,
            marker_map: None,
            component_id: None,
        }
    }

    /// Set the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<RawValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Attach the scope's marker map.
    #[must_use]
    pub fn marker_map(mut self, map: SharedMarkerMap) -> Self {
        self.marker_map = Some(map);
        self
    }

    /// Set the component id.
    #[must_use]
    pub fn component_id(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    /// Build options from declarative template attributes.
    ///
    /// Recognised attributes: `preset` (required), `value`, and
    /// `component-id` (also spelled `componentId` or `id`). The marker map is
    /// not expressible as text; attach it with [`ValidatorOptions::marker_map`].
    pub fn from_attributes<I, K, V>(attributes: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut preset = None;
        let mut value = RawValue::Empty;
        let mut component_id = None;

        for (name, raw) in attributes {
            let name = name.as_ref();
            let raw: String = raw.into();
            match name {
                "preset" => preset = Some(raw.parse::<ValidationPreset>()?),
                "value" => value = RawValue::Text(raw),
                "component-id" | "componentId" | "id" => component_id = Some(raw),
                _ => {
                    vmark_core::warn!(attribute = name, "unknown validator attribute");
                    return Err(ConfigError::UnknownAttribute(name.to_string()));
                }
            }
        }

        let preset = preset.ok_or_else(|| ConfigError::InvalidValue {
            field: "preset".into(),
            value: String::new(),
            message: "attribute is required",
        })?;
        Ok(Self {
            value,
            preset,
            marker_map: None,
            component_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// A validated input component.
pub struct Validator {
    preset: ValidationPreset,
    value: RawValue,
    marker_map: Option<SharedMarkerMap>,
    component_id: Option<String>,
    class_name: Option<String>,
    last_event: Option<ValidationEvent>,
    listeners: Vec<ValidateListener>,
    evaluations: u64,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("preset", &self.preset)
            .field("value", &self.value)
            .field("component_id", &self.component_id)
            .field("class_name", &self.class_name)
            .field("last_event", &self.last_event)
            .field("listeners", &self.listeners.len())
            .field("evaluations", &self.evaluations)
            .finish()
    }
}

impl Validator {
    /// Configure a validator. Nothing is evaluated until [`mount`](Self::mount)
    /// or the first value change.
    ///
    /// Fails if `component_id` is explicitly empty.
    pub fn new(options: ValidatorOptions) -> ConfigResult<Self> {
        let ValidatorOptions {
            value,
            preset,
            marker_map,
            component_id,
        } = options;

        let component_id = match (component_id, &marker_map) {
            (Some(id), _) if id.trim().is_empty() => {
                vmark_core::warn!(preset = %preset, "rejected empty component id");
                return Err(ConfigError::EmptyComponentId);
            }
            (Some(id), _) => Some(id),
            (None, Some(map)) => Some(map.allocate_id()),
            (None, None) => None,
        };

        Ok(Self {
            preset,
            value,
            marker_map,
            component_id,
            class_name: None,
            last_event: None,
            listeners: Vec::new(),
            evaluations: 0,
        })
    }

    /// Subscribe to emitted events.
    pub fn on_validate(&mut self, listener: impl FnMut(&ValidationEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// First evaluation of the bound value.
    pub fn mount(&mut self) -> &ValidationEvent {
        self.run()
    }

    /// Bind a new value and evaluate it.
    ///
    /// Returns `None` without evaluating when `value` equals the bound value.
    pub fn set_value(&mut self, value: impl Into<RawValue>) -> Option<&ValidationEvent> {
        let value = value.into();
        if value.same_value(&self.value) {
            return None;
        }
        self.value = value;
        Some(self.run())
    }

    /// Evaluate the bound value again, even if it did not change.
    pub fn revalidate(&mut self) -> &ValidationEvent {
        self.run()
    }

    fn run(&mut self) -> &ValidationEvent {
        let event = evaluate(self.preset, self.value.clone());

        if let (Some(map), Some(id)) = (&self.marker_map, &self.component_id) {
            self.class_name = map.set_and_get(id, &event);
        }
        self.evaluations += 1;

        vmark_core::trace!(
            component_id = self.component_id.as_deref().unwrap_or(""),
            preset = %self.preset,
            is_valid = event.is_valid(),
            "validator evaluated"
        );

        for listener in &mut self.listeners {
            listener(&event);
        }
        self.last_event.insert(event)
    }

    // -- Accessors -----------------------------------------------------------

    /// The configured preset.
    #[must_use]
    pub fn preset(&self) -> ValidationPreset {
        self.preset
    }

    /// The bound value.
    #[must_use]
    pub fn value(&self) -> &RawValue {
        &self.value
    }

    /// Identity inside the marker map, if any.
    #[must_use]
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }

    /// The marker map this validator reports to.
    #[must_use]
    pub fn marker_map(&self) -> Option<&SharedMarkerMap> {
        self.marker_map.as_ref()
    }

    /// Style class from the marker map after the latest evaluation.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// The most recent event.
    #[must_use]
    pub fn last_event(&self) -> Option<&ValidationEvent> {
        self.last_event.as_ref()
    }

    /// Error text of the most recent event.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.last_event.as_ref().and_then(ValidationEvent::error_text)
    }

    /// Status as seen by the marker map, or from the last event when there
    /// is no map.
    #[must_use]
    pub fn status(&self) -> MarkerStatus {
        match (&self.marker_map, &self.component_id) {
            (Some(map), Some(id)) => map.status(id),
            _ => match &self.last_event {
                Some(event) if event.is_valid() => MarkerStatus::Valid,
                Some(_) => MarkerStatus::Invalid,
                None => MarkerStatus::Unknown,
            },
        }
    }

    /// Number of evaluations performed so far.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}
