//! Per-invocation validation context.

use serde_json::Value;

use crate::config::Config;
use crate::rules::{Constraints, RuleSet, Rules};
use crate::value::Record;

/// Everything a checker can see while validating one (field, rule) pair.
///
/// A context lives for a single checker invocation chain and is rebuilt for
/// every rule; checkers must not assume anything is retained across fields.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The value under validation.
    pub value: &'a Value,
    /// Name of the field the value came from.
    pub field_name: &'a str,
    /// The whole record, for cross-field checks.
    pub data: &'a Record,
    /// Name of the rule currently running.
    pub rule_name: &'a str,
    /// The field's full (normalized) rule set.
    pub rule_set: &'a RuleSet,
    /// All rules in play for this validation pass.
    pub rules: &'a Rules,
    /// The step the rule is running in.
    pub step: &'a str,
    /// Engine configuration (patterns, message tables, empty values).
    pub config: &'a Config,
}

impl<'a> Context<'a> {
    /// The constraints declared for the current rule, if any.
    #[must_use]
    pub fn constraints(&self) -> Option<&'a Constraints> {
        self.rule_set.get(self.rule_name)?.constraints()
    }

    /// A single constraint parameter of the current rule.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&'a Value> {
        self.constraints()?.get(key)
    }
}
