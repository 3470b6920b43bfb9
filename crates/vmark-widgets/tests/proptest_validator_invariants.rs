//! Property tests for the validator component.
//!
//! 1. Each distinct value change evaluates exactly once; repeats are skipped.
//! 2. Once evaluated, the component's class matches the map's class for its id.
//! 3. The last emitted event matches a fresh evaluation of the bound value.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use vmark_core::{MarkerMapOptions, ValidationPreset, evaluate};
use vmark_widgets::FormScope;

fn preset_strategy() -> impl Strategy<Value = ValidationPreset> {
    prop::sample::select(ValidationPreset::ALL.to_vec())
}

proptest! {
    #[test]
    fn one_evaluation_per_change(
        preset in preset_strategy(),
        inputs in prop::collection::vec("[0-9a-f\\-. ]{0,8}", 1..30),
    ) {
        let form = FormScope::new(MarkerMapOptions::new("err").class_name_valid("ok")).unwrap();
        let mut validator = form.validator(preset, "").unwrap();
        let emitted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&emitted);
        validator.on_validate(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut expected = 0usize;
        let mut current = String::new();
        for input in &inputs {
            if *input != current {
                expected += 1;
                current = input.clone();
            }
            validator.set_value(input.as_str());

            if expected > 0 {
                let from_map = form.marker_map().get(validator.component_id().unwrap());
                prop_assert_eq!(validator.class_name(), from_map.as_deref());
            }
        }

        prop_assert_eq!(emitted.load(Ordering::SeqCst), expected);
        prop_assert_eq!(validator.evaluations() as usize, expected);
        if expected > 0 {
            prop_assert_eq!(validator.last_event(), Some(&evaluate(preset, current.as_str())));
        }
    }
}
