#![forbid(unsafe_code)]

//! Rule implementations behind each [`ValidationPreset`].
//!
//! Every rule is a pure predicate over a [`RawValue`]. Parsing conventions are
//! fixed so results do not depend on the host locale:
//!
//! - surrounding whitespace is trimmed before anything else
//! - integers are base-10 with an optional leading `+`/`-`, and must fit in `i64`
//! - floats use `.` as the decimal separator and may carry an exponent
//!   (`1e3`); `NaN` and infinities are rejected
//! - a [`RawValue::Float`] with no fractional part satisfies integer presets
//! - year text is plain digits: no sign and no leading zeros
//! - GUIDs must be the bare canonical form, without braces or a `urn:uuid:` prefix

use std::sync::LazyLock;

use regex::Regex;

use crate::event::{RawValue, ValidationEvent};
use crate::preset::ValidationPreset;

// ---------------------------------------------------------------------------
// Bounds and messages
// ---------------------------------------------------------------------------

/// Smallest accepted year (inclusive).
pub const YEAR_MIN: i64 = 1000;
/// Largest accepted year (inclusive).
pub const YEAR_MAX: i64 = 9999;

/// Error text for [`ValidationPreset::StringNotEmpty`].
pub const MESSAGE_REQUIRED: &str = "This field is required";
/// Error text when an integer was expected.
pub const MESSAGE_NOT_INTEGER: &str = "Must be a whole number";
/// Error text when a number was expected.
pub const MESSAGE_NOT_NUMBER: &str = "Must be a number";
/// Error text for non-positive values under the positive presets.
pub const MESSAGE_NOT_POSITIVE: &str = "Must be greater than zero";
/// Error text when the value is not a year at all.
pub const MESSAGE_NOT_YEAR: &str = "Must be a year";
/// Error text for a year outside [`YEAR_MIN`]..=[`YEAR_MAX`].
pub const MESSAGE_YEAR_RANGE: &str = "Must be a year between 1000 and 9999";
/// Error text for [`ValidationPreset::Guid`].
pub const MESSAGE_NOT_GUID: &str = "Must be a GUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)";

static GUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("GUID pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate `value` against `preset` and build the resulting event.
///
/// Pure and repeatable: the same inputs always yield equal events.
///
/// ```rust
/// use vmark_core::{evaluate, ValidationPreset};
///
/// assert!(evaluate(ValidationPreset::FloatAny, "3.14").is_valid());
/// let event = evaluate(ValidationPreset::NumberPositive, "-5");
/// assert!(!event.is_valid());
/// assert!(event.error_text().is_some());
/// ```
#[must_use]
pub fn evaluate(preset: ValidationPreset, value: impl Into<RawValue>) -> ValidationEvent {
    let value = value.into();
    match check(preset, &value) {
        Ok(()) => {
            crate::trace!(preset = %preset, is_valid = true, "evaluated");
            ValidationEvent::valid(value)
        }
        Err(message) => {
            crate::trace!(preset = %preset, is_valid = false, "evaluated");
            ValidationEvent::invalid(value, message)
        }
    }
}

/// Check `value` against `preset` without building an event.
///
/// Returns the rule's error text on failure.
pub fn check(preset: ValidationPreset, value: &RawValue) -> Result<(), &'static str> {
    match preset {
        ValidationPreset::StringNotEmpty => check_not_empty(value),
        ValidationPreset::NumberAny => as_integer(value).map(drop).ok_or(MESSAGE_NOT_INTEGER),
        ValidationPreset::NumberPositive => {
            let n = as_integer(value).ok_or(MESSAGE_NOT_INTEGER)?;
            if n > 0 { Ok(()) } else { Err(MESSAGE_NOT_POSITIVE) }
        }
        ValidationPreset::FloatAny => as_float(value).map(drop).ok_or(MESSAGE_NOT_NUMBER),
        ValidationPreset::FloatPositive => {
            let x = as_float(value).ok_or(MESSAGE_NOT_NUMBER)?;
            if x > 0.0 { Ok(()) } else { Err(MESSAGE_NOT_POSITIVE) }
        }
        ValidationPreset::Year => {
            let year = as_year(value).ok_or(MESSAGE_NOT_YEAR)?;
            if (YEAR_MIN..=YEAR_MAX).contains(&year) {
                Ok(())
            } else {
                Err(MESSAGE_YEAR_RANGE)
            }
        }
        ValidationPreset::Guid => match value {
            RawValue::Text(s) if is_guid(s.trim()) => Ok(()),
            _ => Err(MESSAGE_NOT_GUID),
        },
    }
}

impl ValidationPreset {
    /// Shorthand for [`evaluate`].
    #[must_use]
    pub fn evaluate(self, value: impl Into<RawValue>) -> ValidationEvent {
        evaluate(self, value)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_not_empty(value: &RawValue) -> Result<(), &'static str> {
    match value {
        RawValue::Empty => Err(MESSAGE_REQUIRED),
        RawValue::Text(s) if s.trim().is_empty() => Err(MESSAGE_REQUIRED),
        RawValue::Text(_) | RawValue::Integer(_) | RawValue::Float(_) => Ok(()),
    }
}

/// Interpret `value` as an integer, or `None` if it is not one.
fn as_integer(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Empty => None,
        RawValue::Integer(n) => Some(*n),
        RawValue::Text(s) => s.trim().parse::<i64>().ok(),
        RawValue::Float(x) => {
            // 2^63 is exactly representable; anything at or above it overflows.
            let in_range = *x >= i64::MIN as f64 && *x < i64::MAX as f64;
            (x.is_finite() && x.fract() == 0.0 && in_range).then_some(*x as i64)
        }
    }
}

/// Like [`as_integer`], but text must be unsigned digits without leading zeros.
fn as_year(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Text(s) => {
            let s = s.trim();
            let leading_zero = s.len() > 1 && s.starts_with('0');
            let plain = !leading_zero && s.bytes().all(|b| b.is_ascii_digit());
            if plain { s.parse::<i64>().ok() } else { None }
        }
        _ => as_integer(value),
    }
}

/// Interpret `value` as a finite float, or `None` if it is not one.
fn as_float(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Empty => None,
        RawValue::Integer(n) => Some(*n as f64),
        RawValue::Float(x) => x.is_finite().then_some(*x),
        RawValue::Text(s) => {
            let s = s.trim();
            // Keeps out "inf", "NaN", "infinity" which `f64::from_str` accepts.
            if !s
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
            {
                return None;
            }
            s.parse::<f64>().ok().filter(|x| x.is_finite())
        }
    }
}

fn is_guid(s: &str) -> bool {
    GUID_PATTERN.is_match(s)
}
