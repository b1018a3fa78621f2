//! Register a custom checker (and a custom step) on one engine instance.
//!
//! Run with: `cargo run --example custom_checker`

use serde_json::Value;
use stickler::prelude::*;

fn no_spaces(value: &Value, _: &Context<'_>) -> bool {
    value.as_str().is_some_and(|s| !s.contains(char::is_whitespace))
}

fn main() {
    let mut engine = Engine::new(Rules::new(), Options::default());

    // A plain predicate registers under the default `during` step.
    engine.register_checker(no_spaces, "no_spaces", None, None);

    // A full checker with its own message and types, in a custom step that
    // runs after the built-in ones.
    engine.register_checker(
        Checker::new(|value, ctx| {
            let banned = ctx.param("words").and_then(Value::as_array);
            match (value.as_str(), banned) {
                (Some(s), Some(words)) => !words
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|word| s.contains(word)),
                _ => true,
            }
        })
        .message("^%{label} contains a banned word")
        .types(
            Shape::new()
                .field("words", TypeRule::tag(TypeTag::Array))
                .into(),
        ),
        "banned_words",
        Some("moderation"),
        None,
    );

    let rules = Rules::new().field(
        "username",
        RuleSet::new()
            .flag("required")
            .flag("no_spaces")
            .rule("banned_words", Constraints::new().param("words", vec!["admin", "root"])),
    );

    for candidate in ["ada", "ad min", "root_user"] {
        let outcome = engine.validate_with(&record! { "username" => candidate }, &rules);
        match outcome {
            Ok(()) => println!("{candidate:?}: ok"),
            Err(errors) => println!("{candidate:?}: {:?}", errors.get("username").unwrap()),
        }
    }
}
