#![forbid(unsafe_code)]

//! The closed set of validation presets.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Names a fixed validation rule.
///
/// A preset is chosen once per validator instance at configuration time and
/// never changes afterwards. Hosts that configure validators from text (a
/// template attribute, an env var, a wire message) go through [`FromStr`] or
/// [`TryFrom<u8>`], both of which reject unknown tags instead of falling back
/// to a permissive rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationPreset {
    /// Trimmed text must be non-empty.
    StringNotEmpty,
    /// Any integer.
    NumberAny,
    /// Integer greater than zero.
    NumberPositive,
    /// Any finite floating-point number.
    FloatAny,
    /// Finite floating-point number greater than zero.
    FloatPositive,
    /// Integer calendar year within `YEAR_MIN..=YEAR_MAX` (see [`crate::rules`]).
    Year,
    /// Canonical 8-4-4-4-12 hexadecimal GUID.
    Guid,
}

impl ValidationPreset {
    /// Every preset, in discriminant order.
    pub const ALL: [Self; 7] = [
        Self::StringNotEmpty,
        Self::NumberAny,
        Self::NumberPositive,
        Self::FloatAny,
        Self::FloatPositive,
        Self::Year,
        Self::Guid,
    ];

    /// Stable name, identical to the variant name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StringNotEmpty => "StringNotEmpty",
            Self::NumberAny => "NumberAny",
            Self::NumberPositive => "NumberPositive",
            Self::FloatAny => "FloatAny",
            Self::FloatPositive => "FloatPositive",
            Self::Year => "Year",
            Self::Guid => "Guid",
        }
    }

    /// Numeric tag (0..=6), matching declaration order.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Parse a preset tag.
    ///
    /// Accepts the variant name in any case and with `-`/`_` separators
    /// (`Guid`, `string-not-empty`, `NUMBER_POSITIVE`), or the numeric tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Self::try_from(index).ok();
        }
        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for ValidationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidationPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::warn!(tag = s, "rejected unknown validation preset");
            ConfigError::UnknownPreset(s.to_string())
        })
    }
}

impl TryFrom<u8> for ValidationPreset {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| ConfigError::UnknownPreset(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_variant_names() {
        for preset in ValidationPreset::ALL {
            assert_eq!(ValidationPreset::parse(preset.name()), Some(preset));
        }
    }

    #[test]
    fn parse_accepts_separators_and_case() {
        assert_eq!(
            ValidationPreset::parse("string-not-empty"),
            Some(ValidationPreset::StringNotEmpty)
        );
        assert_eq!(
            ValidationPreset::parse("NUMBER_POSITIVE"),
            Some(ValidationPreset::NumberPositive)
        );
        assert_eq!(ValidationPreset::parse(" guid "), Some(ValidationPreset::Guid));
    }

    #[test]
    fn parse_accepts_numeric_tags() {
        assert_eq!(ValidationPreset::parse("0"), Some(ValidationPreset::StringNotEmpty));
        assert_eq!(ValidationPreset::parse("6"), Some(ValidationPreset::Guid));
        assert_eq!(ValidationPreset::parse("7"), None);
    }

    #[test]
    fn from_str_fails_fast_on_unknown() {
        let err = "Email".parse::<ValidationPreset>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownPreset("Email".into()));
        assert!("".parse::<ValidationPreset>().is_err());
    }

    #[test]
    fn try_from_round_trips_index() {
        for preset in ValidationPreset::ALL {
            assert_eq!(ValidationPreset::try_from(preset.index()), Ok(preset));
        }
        assert!(ValidationPreset::try_from(200).is_err());
    }

    #[test]
    fn display_is_name() {
        assert_eq!(ValidationPreset::FloatPositive.to_string(), "FloatPositive");
    }
}
