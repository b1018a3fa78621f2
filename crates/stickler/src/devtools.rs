//! Rule-shape self-validation.
//!
//! Development aid: checks that declared constraint values match the types
//! their checkers accept, so a `{min: "3"}` typo surfaces as a diagnostic
//! instead of a silently-failing rule. Runs only when the `devtools` option
//! is on; produces warnings exclusively and never changes validation
//! results.

use serde_json::{Map, Value};

use crate::registry::CheckerRegistry;
use crate::rules::{FieldRules, RuleDecl, Rules};
use crate::typerule::check_type;

/// Presentation keys every rule may carry; they are typed fields on the
/// declaration, never checker parameters, so the shape check skips them.
pub(crate) const RESERVED_KEYS: [&str; 3] = ["message", "fullMessage", "capitalize"];

/// Checks every declared rule against its checker's declared types.
pub(crate) fn check_rules(rules: &Rules, registry: &CheckerRegistry) {
    for (field, field_rules) in rules.iter() {
        // The confirmation shorthand is expanded at validation time and has
        // no declared constraints to check.
        let FieldRules::Set(set) = field_rules else {
            continue;
        };
        for (rule_name, decl) in set.iter() {
            // step_of warns when no step knows the rule name.
            let Some(step) = registry.step_of(rule_name) else {
                continue;
            };
            let Some(types) = registry.get(step, rule_name).and_then(|c| c.declared_types())
            else {
                continue;
            };
            let declared = match decl {
                RuleDecl::Disabled => continue,
                RuleDecl::Flag => Value::Bool(true),
                RuleDecl::Constraints(c) => {
                    let params: Map<String, Value> = c
                        .params()
                        .iter()
                        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                        .map(|(key, v)| (key.clone(), v.clone()))
                        .collect();
                    Value::Object(params)
                }
            };
            if !check_type(&declared, types) {
                tracing::warn!(
                    field,
                    rule = rule_name,
                    "constraint declaration does not comply with the checker's type rules"
                );
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
