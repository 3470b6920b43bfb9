#![forbid(unsafe_code)]

//! Raw input values and the validation event value object.

use std::fmt;

#[cfg(feature = "serde")]
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// RawValue
// ---------------------------------------------------------------------------

/// The raw value a validator is bound to.
///
/// Input fields usually hand over text, but hosts that bind numeric models
/// directly may pass numbers; the rules accept both.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawValue {
    /// Nothing bound (null/undefined on the host side).
    #[default]
    Empty,
    /// Text as typed.
    Text(String),
    /// An integer model value.
    Integer(i64),
    /// A floating-point model value.
    Float(f64),
}

impl RawValue {
    /// Returns `true` for [`RawValue::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Borrow the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether `self` and `other` hold the same input.
    ///
    /// Unlike `==`, floats compare by bit pattern, so a bound `NaN` is the
    /// same value as itself.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

// ---------------------------------------------------------------------------
// ValidationEvent
// ---------------------------------------------------------------------------

/// Outcome of one evaluation.
///
/// Built fresh for every evaluation and never mutated; two events are equal
/// when all fields are equal. `error_text` is `Some` exactly when the value
/// failed its rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "EventFields")
)]
pub struct ValidationEvent {
    is_valid: bool,
    value: RawValue,
    error_text: Option<String>,
}

impl ValidationEvent {
    /// A passing event.
    #[must_use]
    pub fn valid(value: impl Into<RawValue>) -> Self {
        Self {
            is_valid: true,
            value: value.into(),
            error_text: None,
        }
    }

    /// A failing event with its error text.
    #[must_use]
    pub fn invalid(value: impl Into<RawValue>, error_text: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            value: value.into(),
            error_text: Some(error_text.into()),
        }
    }

    /// Whether the value passed its rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The evaluated value.
    #[must_use]
    pub fn value(&self) -> &RawValue {
        &self.value
    }

    /// Rule-specific error text, present only for failing events.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// Consume the event and return its value.
    #[must_use]
    pub fn into_value(self) -> RawValue {
        self.value
    }
}

/// Unchecked wire form of [`ValidationEvent`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EventFields {
    is_valid: bool,
    value: RawValue,
    error_text: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<EventFields> for ValidationEvent {
    type Error = ConfigError;

    fn try_from(fields: EventFields) -> Result<Self, Self::Error> {
        match (fields.is_valid, fields.error_text) {
            (true, None) => Ok(Self::valid(fields.value)),
            (false, Some(text)) => Ok(Self::invalid(fields.value, text)),
            (true, Some(text)) => Err(ConfigError::InvalidValue {
                field: "error_text".into(),
                value: text,
                message: "valid events carry no error text",
            }),
            (false, None) => Err(ConfigError::InvalidValue {
                field: "error_text".into(),
                value: String::new(),
                message: "invalid events need error text",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_event_has_no_error_text() {
        let event = ValidationEvent::valid("abc");
        assert!(event.is_valid());
        assert_eq!(event.error_text(), None);
        assert_eq!(event.value(), &RawValue::Text("abc".into()));
    }

    #[test]
    fn invalid_event_keeps_error_text() {
        let event = ValidationEvent::invalid(-5, "Must be greater than zero");
        assert!(!event.is_valid());
        assert_eq!(event.error_text(), Some("Must be greater than zero"));
        assert_eq!(event.into_value(), RawValue::Integer(-5));
    }

    #[test]
    fn events_compare_by_value() {
        assert_eq!(ValidationEvent::valid(1.5), ValidationEvent::valid(1.5));
        assert_ne!(ValidationEvent::valid("a"), ValidationEvent::valid("b"));
    }

    #[test]
    fn same_value_treats_nan_as_itself() {
        let nan = RawValue::Float(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.same_value(&RawValue::Float(f64::NAN)));
        assert!(!RawValue::Float(0.0).same_value(&RawValue::Float(-0.0)));
        assert!(RawValue::from("a").same_value(&RawValue::from("a")));
        assert!(!RawValue::Integer(1).same_value(&RawValue::Float(1.0)));
    }

    #[test]
    fn raw_value_from_option() {
        assert_eq!(RawValue::from(None::<i64>), RawValue::Empty);
        assert_eq!(RawValue::from(Some("x")), RawValue::Text("x".into()));
    }

    #[test]
    fn raw_value_display() {
        assert_eq!(RawValue::Empty.to_string(), "");
        assert_eq!(RawValue::Integer(42).to_string(), "42");
        assert_eq!(RawValue::from("hi").to_string(), "hi");
    }
}
