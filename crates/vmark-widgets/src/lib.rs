#![forbid(unsafe_code)]

//! Widgets: the validator component, its installation surface, and the form
//! scope that owns a marker map.

pub mod form;
pub mod registry;
pub mod validator;

pub use form::{FormScope, SubmitOutcome};
pub use registry::{
    ComponentFactory, ComponentRegistry, InstallError, Registry, VALIDATOR_TAG, install,
};
pub use validator::{ValidateListener, Validator, ValidatorOptions};
