//! Property tests for the template engine and the outcome invariant.

use proptest::prelude::*;
use serde_json::json;
use stickler::prelude::*;
use stickler::{Replacements, render};

proptest! {
    // Rendering is the identity on strings without placeholder tokens.
    #[test]
    fn render_is_identity_without_placeholders(s in "[^%]*") {
        let replacements = Replacements::new();
        prop_assert_eq!(render(&s, &replacements), s);
    }

    // A defined placeholder substitutes verbatim, with no re-expansion of
    // whatever the replacement contained.
    #[test]
    fn render_substitutes_verbatim(v in ".*") {
        let mut replacements = Replacements::new();
        replacements.insert("x".to_string(), json!(v.clone()));
        prop_assert_eq!(render("a %{x} b", &replacements), format!("a {v} b"));
    }

    // An undefined placeholder survives rendering untouched.
    #[test]
    fn render_keeps_undefined_placeholders(name in "[a-z_][a-z0-9_]{0,10}") {
        let replacements = Replacements::new();
        let template = format!("pre %{{{name}}} post");
        prop_assert_eq!(render(&template, &replacements), template);
    }

    // The outcome is Ok exactly when the error map is empty, for any
    // string value.
    #[test]
    fn outcome_matches_error_map(value in ".*") {
        let rules = Rules::new().field(
            "name",
            RuleSet::new().rule("length", Constraints::new().param("min", 3)),
        );
        let mut engine = Engine::new(rules, Options { silent: true, ..Options::default() });
        let data = record! { "name" => value };
        match engine.validate(&data) {
            Ok(()) => prop_assert!(engine.messages().is_empty()),
            Err(errors) => prop_assert!(!errors.is_empty()),
        }
    }
}
