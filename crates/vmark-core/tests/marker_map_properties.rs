//! Property tests for the rule set and the marker map.
//!
//! 1. `evaluate` is deterministic.
//! 2. Failing events always carry non-empty error text; passing ones never do.
//! 3. Any non-blank string satisfies `StringNotEmpty`.
//! 4. Integer text satisfies `NumberAny`; positivity decides `NumberPositive`.
//! 5. Formatted finite floats satisfy `FloatAny`.
//! 6. `validate_all` equals "every last-written flag is true".
//! 7. `get` on unknown ids equals `get` on explicitly invalid ids.
//! 8. `on_changed` runs exactly once per `set`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use vmark_core::{
    MarkerMap, MarkerMapOptions, MarkerStatus, ValidationEvent, ValidationPreset, evaluate,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn preset_strategy() -> impl Strategy<Value = ValidationPreset> {
    prop::sample::select(ValidationPreset::ALL.to_vec())
}

fn event(valid: bool) -> ValidationEvent {
    if valid {
        ValidationEvent::valid("v")
    } else {
        ValidationEvent::invalid("v", "bad")
    }
}

fn map() -> MarkerMap {
    MarkerMap::new(MarkerMapOptions::new("err").class_name_valid("ok")).unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// Rule set
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn evaluate_is_deterministic(preset in preset_strategy(), input in ".{0,40}") {
        prop_assert_eq!(evaluate(preset, input.as_str()), evaluate(preset, input.as_str()));
    }

    #[test]
    fn error_text_present_iff_invalid(preset in preset_strategy(), input in ".{0,40}") {
        let event = evaluate(preset, input.as_str());
        if event.is_valid() {
            prop_assert!(event.error_text().is_none());
        } else {
            prop_assert!(event.error_text().is_some_and(|t| !t.is_empty()));
        }
    }

    #[test]
    fn non_blank_strings_are_not_empty(input in "\\s*[a-zA-Z0-9]{1,10}\\s*") {
        prop_assert!(evaluate(ValidationPreset::StringNotEmpty, input.as_str()).is_valid());
    }

    #[test]
    fn integer_text_is_number(n in any::<i64>()) {
        let text = n.to_string();
        prop_assert!(evaluate(ValidationPreset::NumberAny, text.as_str()).is_valid());
        prop_assert_eq!(
            evaluate(ValidationPreset::NumberPositive, text.as_str()).is_valid(),
            n > 0
        );
    }

    #[test]
    fn finite_float_text_is_float(x in -1.0e12f64..1.0e12) {
        let text = format!("{x}");
        prop_assert!(evaluate(ValidationPreset::FloatAny, text.as_str()).is_valid());
        prop_assert_eq!(
            evaluate(ValidationPreset::FloatPositive, text.as_str()).is_valid(),
            x > 0.0
        );
    }

    #[test]
    fn year_matches_bounds(n in -20_000i64..20_000) {
        prop_assert_eq!(
            evaluate(ValidationPreset::Year, n).is_valid(),
            (1000..=9999).contains(&n)
        );
    }

    #[test]
    fn guids_from_hex_groups_are_valid(
        a in "[0-9a-fA-F]{8}",
        b in "[0-9a-fA-F]{4}",
        c in "[0-9a-fA-F]{4}",
        d in "[0-9a-fA-F]{4}",
        e in "[0-9a-fA-F]{12}",
    ) {
        let guid = format!("{a}-{b}-{c}-{d}-{e}");
        prop_assert!(evaluate(ValidationPreset::Guid, guid.as_str()).is_valid());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Marker map
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn validate_all_matches_last_writes(
        writes in prop::collection::vec(("[a-e]", any::<bool>()), 0..40)
    ) {
        let mut map = map();
        let mut model: HashMap<String, bool> = HashMap::new();
        for (id, valid) in &writes {
            map.set(id, &event(*valid));
            model.insert(id.clone(), *valid);
        }
        prop_assert_eq!(map.validate_all(), model.values().all(|v| *v));
        prop_assert_eq!(map.len(), model.len());
        for (id, valid) in &model {
            let expected = if *valid { MarkerStatus::Valid } else { MarkerStatus::Invalid };
            prop_assert_eq!(map.status(id), expected);
        }
    }

    #[test]
    fn unknown_ids_style_like_invalid(
        writes in prop::collection::vec(("[a-e]", any::<bool>()), 0..20),
        probe in "[f-z]{1,4}",
    ) {
        let mut map = map();
        for (id, valid) in &writes {
            map.set(id, &event(*valid));
        }
        map.set("explicit-bad", &event(false));
        prop_assert_eq!(map.get(&probe), map.get("explicit-bad"));
        prop_assert_eq!(map.status(&probe), MarkerStatus::Unknown);
    }

    #[test]
    fn on_changed_once_per_set(count in 0usize..50) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut map = map().with_on_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        for i in 0..count {
            map.set(&format!("f{}", i % 3), &event(i % 2 == 0));
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), count);
    }
}
