#![forbid(unsafe_code)]

//! Marker map construction options.
//!
//! Options can be built in code or read from the environment:
//!
//! | Variable | Field | Required |
//! |----------|-------|----------|
//! | `VMARK_CLASS_INVALID` | `class_name_invalid` | yes |
//! | `VMARK_CLASS_VALID` | `class_name_valid` | no |
//!
//! Environment parsing collects every problem instead of stopping at the
//! first one; [`MarkerMap::new`](crate::MarkerMap::new) still refuses options
//! that fail [`MarkerMapOptions::validate`].

use std::env;

use crate::error::ConfigError;

/// Environment variable for [`MarkerMapOptions::class_name_invalid`].
pub const ENV_CLASS_INVALID: &str = "VMARK_CLASS_INVALID";
/// Environment variable for [`MarkerMapOptions::class_name_valid`].
pub const ENV_CLASS_VALID: &str = "VMARK_CLASS_VALID";

/// Style names applied by a marker map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerMapOptions {
    /// Class returned for ids that are invalid or unknown. Required.
    pub class_name_invalid: String,
    /// Class returned for valid ids. When `None`, valid ids get no class.
    pub class_name_valid: Option<String>,
}

/// Options parsed from the environment, with diagnostics.
#[derive(Debug, Clone)]
pub struct MarkerMapOptionsParse {
    /// Options built from the variables that parsed.
    pub options: MarkerMapOptions,
    /// One entry per rejected or missing variable.
    pub errors: Vec<ConfigError>,
}

impl MarkerMapOptions {
    /// Options with only the invalid class set.
    #[must_use]
    pub fn new(class_name_invalid: impl Into<String>) -> Self {
        Self {
            class_name_invalid: class_name_invalid.into(),
            class_name_valid: None,
        }
    }

    /// Set the class used for valid ids.
    #[must_use]
    pub fn class_name_valid(mut self, class_name: impl Into<String>) -> Self {
        self.class_name_valid = Some(class_name.into());
        self
    }

    /// Parse options from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env() -> MarkerMapOptionsParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate option constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.class_name_invalid.trim().is_empty() {
            errors.push(ConfigError::MissingClassNameInvalid);
        }
        if let Some(valid) = &self.class_name_valid
            && valid.trim().is_empty()
        {
            errors.push(ConfigError::InvalidValue {
                field: "class_name_valid".into(),
                value: valid.clone(),
                message: "must not be blank when set",
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> MarkerMapOptionsParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut options = MarkerMapOptions::new(String::new());
    let mut errors = Vec::new();

    match get(ENV_CLASS_INVALID) {
        Some(value) if !value.trim().is_empty() => options.class_name_invalid = value,
        _ => errors.push(ConfigError::MissingClassNameInvalid),
    }

    // Unset and blank both mean "no valid class".
    if let Some(value) = get(ENV_CLASS_VALID)
        && !value.trim().is_empty()
    {
        options.class_name_valid = Some(value);
    }

    if !errors.is_empty() {
        crate::warn!(count = errors.len(), "marker map options from environment rejected");
    }

    MarkerMapOptionsParse { options, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> MarkerMapOptionsParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn builder_sets_both_classes() {
        let options = MarkerMapOptions::new("err").class_name_valid("ok");
        assert_eq!(options.class_name_invalid, "err");
        assert_eq!(options.class_name_valid.as_deref(), Some("ok"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_invalid_class() {
        let errors = MarkerMapOptions::new("  ").validate().unwrap_err();
        assert_eq!(errors, vec![ConfigError::MissingClassNameInvalid]);
    }

    #[test]
    fn validate_reports_every_violation() {
        let errors = MarkerMapOptions::new("")
            .class_name_valid("")
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn env_reads_both_classes() {
        let parsed = parse(&[(ENV_CLASS_INVALID, "is-invalid"), (ENV_CLASS_VALID, "is-valid")]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.options.class_name_invalid, "is-invalid");
        assert_eq!(parsed.options.class_name_valid.as_deref(), Some("is-valid"));
    }

    #[test]
    fn env_missing_invalid_class_is_reported() {
        let parsed = parse(&[(ENV_CLASS_VALID, "ok")]);
        assert_eq!(parsed.errors, vec![ConfigError::MissingClassNameInvalid]);
        assert!(parsed.options.validate().is_err());
    }

    #[test]
    fn env_blank_valid_class_means_none() {
        let parsed = parse(&[(ENV_CLASS_INVALID, "err"), (ENV_CLASS_VALID, " ")]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.options.class_name_valid, None);
    }
}
