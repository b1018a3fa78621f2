//! The validation engine.
//!
//! [`Engine`] owns the rules, the options, the configuration and a private
//! copy of the checker registry, and drives the stepped dispatch loop: for
//! every field of the record, for every step in order, every declared rule
//! whose checker lives in that step runs; a field that collected errors at
//! the end of a step skips the remaining steps. Failure messages resolve
//! through the declaration → checker → fallback-table chain and render via
//! the template engine.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::checker::{Checker, ValidateFn};
use crate::checkers;
use crate::compare;
use crate::config::Config;
use crate::context::Context;
use crate::devtools;
use crate::message::resolve_template;
use crate::registry::{CheckerRegistry, Registration};
use crate::rules::{Constraints, FieldRules, RuleDecl, RuleSet, Rules};
use crate::template::{Replacements, render_with, ucfirst};
use crate::value::Record;

// ============================================================================
// OPTIONS
// ============================================================================

/// Per-engine behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Uppercase the first character of every error message.
    pub capitalize: bool,
    /// Prefix error messages with the field label.
    pub full_messages: bool,
    /// Suppress diagnostics (unknown placeholders, disabled rules, ...).
    pub silent: bool,
    /// Run the rule-shape validator on declared rules.
    pub devtools: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            capitalize: true,
            full_messages: false,
            silent: false,
            // Rule-shape diagnostics are a development aid; release builds
            // skip them.
            devtools: cfg!(debug_assertions),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// The per-field error messages of a failed validation.
///
/// Each failing rule contributes one composed message to its field's list,
/// in rule-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    fields: IndexMap<String, Vec<String>>,
}

impl Errors {
    /// True when no field collected a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The messages collected for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterates `(field, messages)` in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn push(&mut self, field: &str, message: String) {
        self.fields.entry(field.to_string()).or_default().push(message);
    }

    fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.fields.values().map(Vec::len).sum();
        writeln!(f, "validation failed with {total} error(s):")?;
        for (field, messages) in &self.fields {
            for message in messages {
                writeln!(f, "  {field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

// ============================================================================
// ENGINE
// ============================================================================

/// A configured validator for flat records.
#[derive(Debug, Clone)]
pub struct Engine {
    options: Options,
    config: Config,
    registry: CheckerRegistry,
    rules: Rules,
    errors: Errors,
    /// Resolved message templates, keyed `rule` / `rule::constraint`.
    message_cache: HashMap<String, String>,
    /// Rule name → owning step.
    step_cache: HashMap<String, Option<String>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Rules::new(), Options::default())
    }
}

impl Engine {
    /// An engine with the given rules and options and default configuration.
    #[must_use]
    pub fn new(rules: Rules, options: Options) -> Self {
        Self::with_config(rules, options, Config::default())
    }

    /// An engine with an explicit [`Config`].
    #[must_use]
    pub fn with_config(rules: Rules, options: Options, config: Config) -> Self {
        let engine = Self {
            options,
            config,
            registry: checkers::builtin(),
            rules,
            errors: Errors::default(),
            message_cache: HashMap::new(),
            step_cache: HashMap::new(),
        };
        if engine.options.devtools && !engine.options.silent {
            devtools::check_rules(&engine.rules, &engine.registry);
        }
        engine
    }

    /// Validates a record against the engine's stored rules.
    pub fn validate(&mut self, data: &Record) -> Result<(), Errors> {
        self.run(data, None)
    }

    /// Validates a record against one-off rules.
    ///
    /// The rule-shape validator runs against them first (when enabled).
    pub fn validate_with(&mut self, data: &Record, rules: &Rules) -> Result<(), Errors> {
        if self.options.devtools && !self.options.silent {
            devtools::check_rules(rules, &self.registry);
        }
        self.run(data, Some(rules))
    }

    fn run(&mut self, data: &Record, rules: Option<&Rules>) -> Result<(), Errors> {
        self.errors = Errors::default();
        let rules = rules.unwrap_or(&self.rules);
        let mut pass = Pass {
            options: &self.options,
            config: &self.config,
            registry: &self.registry,
            rules,
            errors: &mut self.errors,
            cache: &mut self.message_cache,
        };
        for (field, value) in data {
            pass.check_field(field, value, data);
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    /// The errors of the last validation run.
    #[must_use]
    pub fn messages(&self) -> &Errors {
        &self.errors
    }

    /// This engine's checker registry.
    #[must_use]
    pub fn checkers(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// The engine's stored rules.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers (or overrides) a checker on this engine only.
    ///
    /// See [`CheckerRegistry::register`] for the semantics of `step` and
    /// `step_order`.
    pub fn register_checker(
        &mut self,
        checker: impl Into<Checker>,
        name: &str,
        step: Option<&str>,
        step_order: Option<Vec<String>>,
    ) {
        self.step_cache.clear();
        self.registry.register(checker, name, step, step_order);
    }

    /// Registers a tree of checkers on this engine only.
    pub fn register_checkers(&mut self, tree: IndexMap<String, Registration>) {
        self.step_cache.clear();
        self.registry.register_bulk(tree);
    }

    /// The step a rule name belongs to, memoized per engine.
    pub fn step_of(&mut self, rule_name: &str) -> Option<String> {
        if let Some(hit) = self.step_cache.get(rule_name) {
            return hit.clone();
        }
        let step = self.registry.step_of(rule_name).map(ToString::to_string);
        self.step_cache.insert(rule_name.to_string(), step.clone());
        step
    }

    /// Runs the rule-shape validator against `rules` (devtools only).
    pub fn check_rules(&self, rules: &Rules) {
        if self.options.devtools && !self.options.silent {
            devtools::check_rules(rules, &self.registry);
        }
    }

    /// Compares two values with an operator or alias from the comparator
    /// table.
    #[must_use]
    pub fn compare(&self, lhs: &Value, op: &str, rhs: &Value) -> bool {
        compare::compare(lhs, op, rhs, !self.options.silent)
    }
}

// ============================================================================
// DISPATCH PASS
// ============================================================================

/// One validation run. Borrows the engine's pieces separately so message
/// resolution can write the cache while rules and registry stay shared.
struct Pass<'a> {
    options: &'a Options,
    config: &'a Config,
    registry: &'a CheckerRegistry,
    rules: &'a Rules,
    errors: &'a mut Errors,
    cache: &'a mut HashMap<String, String>,
}

impl Pass<'_> {
    fn check_field(&mut self, field: &str, value: &Value, data: &Record) {
        let rules = self.rules;
        let config = self.config;
        let registry = self.registry;

        // Shorthand expansion happens on an internal view; the caller's
        // declarations are never rewritten.
        let expanded: RuleSet;
        let rule_set: &RuleSet = match rules.get(field) {
            None => return,
            Some(FieldRules::Set(set)) => set,
            Some(FieldRules::Confirmation) => {
                let Some(caps) = config.confirmation_re.captures(field) else {
                    // Not a confirmation field: the declaration is inert.
                    return;
                };
                expanded = RuleSet::new().rule(
                    "confirms",
                    Constraints::new().param("field", caps[1].to_string()),
                );
                &expanded
            }
        };

        for step in registry.steps() {
            'rules: for (rule_name, decl) in rule_set.iter() {
                // Rule names belong to exactly one step; a name this step
                // does not know is simply not evaluated in this pass.
                let Some(checker) = registry.get(step, rule_name) else {
                    continue;
                };
                if matches!(decl, RuleDecl::Disabled) {
                    if !self.options.silent {
                        tracing::warn!(
                            field,
                            rule = rule_name,
                            "rule declaration set to `false`, are you sure?"
                        );
                    }
                    break 'rules;
                }
                let ctx = Context {
                    value,
                    field_name: field,
                    data,
                    rule_name,
                    rule_set,
                    rules,
                    step: step.as_str(),
                    config,
                };
                let mut failures: SmallVec<[Option<&str>; 4]> = SmallVec::new();
                if checker.preprocess.as_ref().is_some_and(|pre| !pre(value, &ctx)) {
                    failures.push(Some("preprocess"));
                } else {
                    match &checker.validate {
                        ValidateFn::Rule(validate) => {
                            if !validate(value, &ctx) {
                                failures.push(None);
                            }
                        }
                        ValidateFn::PerConstraint(predicates) => {
                            let Some(constraints) = decl.constraints() else {
                                continue;
                            };
                            for key in constraints.params().keys() {
                                match predicates.get(key) {
                                    Some(predicate) => {
                                        if !predicate(value, &ctx) {
                                            failures.push(Some(key.as_str()));
                                        }
                                    }
                                    None => {
                                        if !self.options.silent {
                                            tracing::warn!(
                                                rule = rule_name,
                                                constraint = %key,
                                                "no predicate for constraint"
                                            );
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                if !failures.is_empty() {
                    let message = self.compose(&ctx, decl, checker, &failures);
                    self.errors.push(field, message);
                }
            }
            // Cross-step short-circuit: a field that failed this step never
            // reaches the next one.
            if self.errors.contains(field) {
                break;
            }
        }
    }

    /// Composes the final message for one failing rule: resolve one
    /// template per failed constraint, join, apply label and
    /// capitalization policy, render placeholders.
    fn compose(
        &mut self,
        ctx: &Context<'_>,
        decl: &RuleDecl,
        checker: &Checker,
        failures: &[Option<&str>],
    ) -> String {
        let parts: Vec<String> = failures
            .iter()
            .map(|constraint| self.resolve(ctx, decl, checker, *constraint))
            .collect();
        let mut message = parts.join(self.config.message_join.as_ref());

        let mut replacements = Replacements::new();
        replacements.insert("value".to_string(), ctx.value.clone());
        replacements.insert("label".to_string(), Value::String(ctx.field_name.to_string()));
        let constraints = decl.constraints();
        if let Some(constraints) = constraints {
            for (key, v) in constraints.params() {
                replacements.insert(key.clone(), v.clone());
            }
        }

        let no_prepend = message.starts_with(self.config.no_label_char);
        let full = constraints
            .and_then(|c| c.full_message)
            .unwrap_or(self.options.full_messages);
        if full && !no_prepend {
            message = format!("%{{label}} {message}");
        }
        if no_prepend {
            message.remove(0);
        }
        let mut message = render_with(&message, &replacements, !self.options.silent);
        let capitalize = constraints
            .and_then(|c| c.capitalize)
            .unwrap_or(self.options.capitalize);
        if capitalize {
            message = ucfirst(&message);
        }
        message
    }

    /// Resolves the message template for one failure, memoized by
    /// `rule[::constraint]` for the engine's lifetime.
    fn resolve(
        &mut self,
        ctx: &Context<'_>,
        decl: &RuleDecl,
        checker: &Checker,
        constraint: Option<&str>,
    ) -> String {
        let key = match constraint {
            Some(c) => format!("{}::{c}", ctx.rule_name),
            None => ctx.rule_name.to_string(),
        };
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let declared = decl.constraints().and_then(Constraints::message_spec);
        let template = if constraint == Some("preprocess") {
            resolve_template(
                [declared, checker.preprocess_message.as_ref(), None],
                ctx,
                constraint,
            )
        } else {
            resolve_template(
                [
                    declared,
                    checker.message.as_ref(),
                    self.config.messages.get(ctx.rule_name),
                ],
                ctx,
                constraint,
            )
        };
        self.cache.insert(key, template.clone());
        template
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use crate::rules::Constraints;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn quiet() -> Options {
        Options {
            silent: true,
            ..Options::default()
        }
    }

    #[test]
    fn empty_rules_validate_anything() {
        let mut engine = Engine::new(Rules::new(), quiet());
        assert!(engine.validate(&record! { "anything" => 42 }).is_ok());
        assert!(engine.messages().is_empty());
    }

    #[test]
    fn failing_rule_collects_a_message() {
        let rules = Rules::new().field("name", RuleSet::new().flag("required"));
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "" }).unwrap_err();
        assert_eq!(errors.get("name"), Some(&["Is required".to_string()][..]));
    }

    #[test]
    fn repeated_validation_is_idempotent() {
        let rules = Rules::new().field("name", RuleSet::new().flag("required"));
        let mut engine = Engine::new(rules, quiet());
        let data = record! { "name" => "" };
        let first = engine.validate(&data).unwrap_err();
        let second = engine.validate(&data).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn before_step_failure_skips_during_step() {
        let rules = Rules::new().field(
            "name",
            RuleSet::new()
                .flag("required")
                .rule("length", Constraints::new().param("min", 3)),
        );
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "" }).unwrap_err();
        // Only the `before` failure: `length` never ran.
        assert_eq!(errors.get("name").unwrap().len(), 1);
        assert_eq!(errors.get("name").unwrap()[0], "Is required");
    }

    #[test]
    fn failures_within_a_step_accumulate() {
        let rules = Rules::new().field(
            "name",
            RuleSet::new()
                .rule("length", Constraints::new().param("min", 10))
                .rule("format", Constraints::new().param("pattern", "^[a-z]+$")),
        );
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "A1" }).unwrap_err();
        assert_eq!(errors.get("name").unwrap().len(), 2);
    }

    #[test]
    fn multiple_constraint_failures_join() {
        // min > max is contradictory; both bounds fail at once.
        let rules = Rules::new().field(
            "name",
            RuleSet::new().rule("length", Constraints::new().param("is", 5).param("min", 10)),
        );
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "ab" }).unwrap_err();
        let message = &errors.get("name").unwrap()[0];
        assert!(message.contains(", "), "joined message, got: {message}");
    }

    #[test]
    fn disabled_rule_aborts_the_step() {
        let rules = Rules::new().field(
            "name",
            RuleSet::new()
                .disabled("length")
                .rule("format", Constraints::new().param("pattern", "^x+$")),
        );
        let mut engine = Engine::new(rules, quiet());
        // `format` would fail, but the disabled `length` aborts the step
        // before it runs.
        assert!(engine.validate(&record! { "name" => "abc" }).is_ok());
    }

    #[test]
    fn confirmation_shorthand_expands() {
        let rules = Rules::new().confirmation("password_confirmation");
        let mut engine = Engine::new(rules, quiet());
        assert!(
            engine
                .validate(&record! { "password" => "s3cret", "password_confirmation" => "s3cret" })
                .is_ok()
        );
        let errors = engine
            .validate(&record! { "password" => "s3cret", "password_confirmation" => "other" })
            .unwrap_err();
        assert_eq!(
            errors.get("password_confirmation").unwrap()[0],
            "Should be the same as password"
        );
    }

    #[test]
    fn shorthand_on_non_confirmation_field_is_inert() {
        let rules = Rules::new().confirmation("nickname");
        let mut engine = Engine::new(rules, quiet());
        assert!(engine.validate(&record! { "nickname" => "" }).is_ok());
    }

    #[test]
    fn fields_without_rules_are_ignored() {
        let rules = Rules::new().field("name", RuleSet::new().flag("required"));
        let mut engine = Engine::new(rules, quiet());
        assert!(engine.validate(&record! { "other" => "" }).is_ok());
    }

    #[test]
    fn preprocess_failure_reports_the_structural_problem() {
        let rules = Rules::new().field("email", RuleSet::new().flag("email"));
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "email" => 50 }).unwrap_err();
        let message = &errors.get("email").unwrap()[0];
        assert!(message.contains("must be of type string"), "got: {message}");
        assert!(message.contains("50"), "got: {message}");
    }

    #[test]
    fn declared_message_wins_over_builtin() {
        let rules = Rules::new().field(
            "name",
            RuleSet::new().rule(
                "length",
                Constraints::new()
                    .param("min", 5)
                    .message(crate::message::MessageSpec::per_constraint([(
                        "min",
                        "needs at least %{min} characters",
                    )])),
            ),
        );
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "ab" }).unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "Needs at least 5 characters");
    }

    #[test]
    fn full_messages_prefixes_the_label() {
        let options = Options {
            full_messages: true,
            silent: true,
            ..Options::default()
        };
        let rules = Rules::new().field("name", RuleSet::new().flag("required"));
        let mut engine = Engine::new(rules, options);
        let errors = engine.validate(&record! { "name" => "" }).unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "Name is required");
    }

    #[test]
    fn no_label_sentinel_suppresses_the_prefix() {
        let options = Options {
            full_messages: true,
            silent: true,
            ..Options::default()
        };
        let rules = Rules::new().field(
            "name",
            RuleSet::new().rule(
                "length",
                Constraints::new()
                    .param("min", 3)
                    .message("^needs %{min}+ characters"),
            ),
        );
        let mut engine = Engine::new(rules, options);
        let errors = engine.validate(&record! { "name" => "ab" }).unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "Needs 3+ characters");
    }

    #[test]
    fn per_rule_overrides_beat_instance_defaults() {
        let rules = Rules::new().field(
            "name",
            RuleSet::new().rule(
                "length",
                Constraints::new().param("min", 3).capitalize(false),
            ),
        );
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "ab" }).unwrap_err();
        assert!(errors.get("name").unwrap()[0].starts_with("must be"));
    }

    fn has_x(value: &Value, _: &Context<'_>) -> bool {
        value.as_str().is_some_and(|s| s.contains('x'))
    }

    fn always_fails(_: &Value, _: &Context<'_>) -> bool {
        false
    }

    #[test]
    fn custom_checker_registration() {
        let mut engine = Engine::new(Rules::new(), quiet());
        engine.register_checker(has_x, "has_x", None, None);
        let rules = Rules::new().field("name", RuleSet::new().flag("has_x"));
        assert!(engine.validate_with(&record! { "name" => "axe" }, &rules).is_ok());
        let errors = engine
            .validate_with(&record! { "name" => "abc" }, &rules)
            .unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "Is not valid.");
    }

    #[test]
    fn custom_step_runs_after_builtin_steps() {
        let mut engine = Engine::new(Rules::new(), quiet());
        engine.register_checker(always_fails, "always_fails", Some("after"), None);
        assert_eq!(engine.step_of("always_fails"), Some("after".to_string()));
        let rules = Rules::new().field(
            "name",
            RuleSet::new()
                .rule("length", Constraints::new().param("min", 1))
                .flag("always_fails"),
        );
        let errors = engine
            .validate_with(&record! { "name" => "ok" }, &rules)
            .unwrap_err();
        // `length` passed in `during`, so the `after` step still ran.
        assert_eq!(errors.get("name").unwrap(), &["Is not valid.".to_string()][..]);
    }

    #[test]
    fn step_of_is_memoized() {
        let mut engine = Engine::new(Rules::new(), quiet());
        assert_eq!(engine.step_of("length"), Some("during".to_string()));
        assert_eq!(engine.step_of("length"), Some("during".to_string()));
        assert_eq!(engine.step_of("nope"), None);
    }

    #[test]
    fn errors_serialize_as_a_plain_map() {
        let rules = Rules::new().field("name", RuleSet::new().flag("required"));
        let mut engine = Engine::new(rules, quiet());
        let errors = engine.validate(&record! { "name" => "" }).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"name": ["Is required"]})
        );
    }

    #[test]
    fn engine_compare_uses_the_alias_table() {
        let engine = Engine::new(Rules::new(), quiet());
        assert!(engine.compare(&json!(6), "greaterThan", &json!(5)));
        assert!(!engine.compare(&json!(6), "nonsense", &json!(5)));
    }
}
