//! Validate a signup form and print the per-field messages.
//!
//! Run with: `cargo run --example basic_usage`

use stickler::prelude::*;

fn main() {
    // Diagnostics (unknown placeholders, rule-shape mismatches, ...) go
    // through `tracing`; a subscriber makes them visible.
    tracing_subscriber::fmt().with_target(false).init();

    let rules = Rules::new()
        .field("email", RuleSet::new().flag("required").flag("email"))
        .field(
            "password",
            RuleSet::new()
                .flag("required")
                .rule("length", Constraints::new().param("min", 8)),
        )
        .confirmation("password_confirmation")
        .field(
            "age",
            RuleSet::new().rule(
                "numeric",
                Constraints::new()
                    .param("greaterThanOrEqualTo", 18)
                    .param("onlyInteger", true),
            ),
        );

    let mut engine = Engine::new(
        rules,
        Options {
            full_messages: true,
            ..Options::default()
        },
    );

    let data = record! {
        "email" => "ada@example",
        "password" => "hunter2",
        "password_confirmation" => "hunter3",
        "age" => "17.5",
    };

    match engine.validate(&data) {
        Ok(()) => println!("record is valid"),
        Err(errors) => {
            for (field, messages) in errors.iter() {
                for message in messages {
                    println!("{field}: {message}");
                }
            }
        }
    }
}
