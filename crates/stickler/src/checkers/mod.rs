//! Built-in checkers.
//!
//! Two `before` checkers (`confirms`, `required`) run ahead of the content
//! checks; four `during` checkers (`email`, `format`, `length`, `numeric`)
//! make up the second step. Every engine instance starts from a clone of
//! this table, so overriding a built-in on one instance leaves the rest of
//! the process alone.

use std::sync::LazyLock;

use crate::registry::CheckerRegistry;

mod confirms;
mod email;
mod format;
mod length;
mod numeric;
mod required;

static BUILTIN: LazyLock<CheckerRegistry> = LazyLock::new(|| {
    let mut registry = CheckerRegistry::new();
    registry.register(confirms::checker(), "confirms", Some("before"), None);
    registry.register(required::checker(), "required", Some("before"), None);
    registry.register(email::checker(), "email", Some("during"), None);
    registry.register(format::checker(), "format", Some("during"), None);
    registry.register(length::checker(), "length", Some("during"), None);
    registry.register(numeric::checker(), "numeric", Some("during"), None);
    registry
});

/// A fresh copy of the built-in checker table.
pub(crate) fn builtin() -> CheckerRegistry {
    BUILTIN.clone()
}

// ============================================================================
// TEST SUPPORT
// ============================================================================

#[cfg(test)]
pub(crate) mod testutil {
    use serde_json::Value;

    use crate::config::Config;
    use crate::context::Context;
    use crate::rules::{RuleSet, Rules};
    use crate::value::Record;

    /// Owns everything a [`Context`] borrows, so checker tests can build
    /// one without running the engine.
    pub(crate) struct Fixture {
        pub data: Record,
        pub rules: Rules,
        pub rule_set: RuleSet,
        pub config: Config,
    }

    impl Fixture {
        pub(crate) fn new(rule_set: RuleSet) -> Self {
            Self {
                data: Record::new(),
                rules: Rules::new(),
                rule_set,
                config: Config::default(),
            }
        }

        pub(crate) fn with_data(mut self, data: Record) -> Self {
            self.data = data;
            self
        }

        pub(crate) fn context<'a>(&'a self, value: &'a Value, rule_name: &'a str) -> Context<'a> {
            Context {
                value,
                field_name: "field",
                data: &self.data,
                rule_name,
                rule_set: &self.rule_set,
                rules: &self.rules,
                step: "during",
                config: &self.config,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_layout() {
        let registry = builtin();
        assert_eq!(registry.steps(), &["before", "during"]);
        assert!(registry.get("before", "confirms").is_some());
        assert!(registry.get("before", "required").is_some());
        assert!(registry.get("during", "email").is_some());
        assert!(registry.get("during", "format").is_some());
        assert!(registry.get("during", "length").is_some());
        assert!(registry.get("during", "numeric").is_some());
        assert_eq!(registry.step_of("length"), Some("during"));
    }
}
