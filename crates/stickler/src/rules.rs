//! Rule declarations.
//!
//! Rules map field names to rule sets; a rule set maps rule names (checker
//! names) to their constraints. Declarations are plain data: they can be
//! built fluently in code or loaded from JSON (the data-only subset —
//! function-valued messages exist only through the builder API).
//!
//! Declarations are read-only to the engine. The confirmation shorthand
//! (`"password_confirmation": true`) is expanded into an internal view at
//! validation time; the caller's structures are never rewritten.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value;
use thiserror::Error;

use crate::message::MessageSpec;
use crate::value::TypeTag;

// ============================================================================
// RULES
// ============================================================================

/// Per-field validation rules for a whole record.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    fields: IndexMap<String, FieldRules>,
}

/// What a single field declares: either the confirmation shorthand or a
/// full rule set.
#[derive(Debug, Clone)]
pub enum FieldRules {
    /// Shorthand for a `confirms` rule inferred from the field name
    /// (`"<base>_confirmation"` confirms `"<base>"`).
    Confirmation,
    /// An explicit set of rules.
    Set(RuleSet),
}

impl Rules {
    /// An empty rule collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares rules for a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rules: RuleSet) -> Self {
        self.fields.insert(name.into(), FieldRules::Set(rules));
        self
    }

    /// Declares the confirmation shorthand for a field.
    #[must_use]
    pub fn confirmation(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldRules::Confirmation);
        self
    }

    /// Looks up a field's declaration.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when no field declares anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses rules from their JSON representation.
    ///
    /// The wire shape mirrors the builder API: `true` for the confirmation
    /// shorthand, rule sets as objects whose values are `true` (flag),
    /// `false` (disabled), a bare pattern string, or a constraints object.
    /// The reserved keys `message`, `fullMessage` and `capitalize` inside a
    /// constraints object become the typed overrides.
    pub fn from_value(value: &Value) -> Result<Self, RuleParseError> {
        let Value::Object(map) = value else {
            return Err(RuleParseError::NotAnObject(TypeTag::of(value)));
        };
        let mut fields = IndexMap::with_capacity(map.len());
        for (field, decl) in map {
            let parsed = match decl {
                Value::Bool(true) => FieldRules::Confirmation,
                Value::Object(rules) => {
                    let mut set = RuleSet::default();
                    for (rule, constraints) in rules {
                        set.rules
                            .insert(rule.clone(), RuleDecl::from_value(field, rule, constraints)?);
                    }
                    FieldRules::Set(set)
                }
                _ => {
                    return Err(RuleParseError::BadFieldRules {
                        field: field.clone(),
                    });
                }
            };
            fields.insert(field.clone(), parsed);
        }
        Ok(Self { fields })
    }
}

impl<'de> Deserialize<'de> for Rules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

/// Failure to parse a JSON rule declaration.
#[derive(Debug, Error)]
pub enum RuleParseError {
    /// The top level was not an object.
    #[error("rules must be a JSON object, got {0}")]
    NotAnObject(TypeTag),
    /// A field's declaration was neither `true` nor an object.
    #[error("rules for field `{field}` must be `true` or a rule-set object")]
    BadFieldRules {
        /// The offending field.
        field: String,
    },
    /// A rule's declaration had an unusable shape.
    #[error("constraints for `{field}.{rule}` must be a boolean, a string or an object")]
    BadRuleDecl {
        /// The offending field.
        field: String,
        /// The offending rule.
        rule: String,
    },
    /// A message override had an unusable shape.
    #[error("message for `{field}.{rule}` must be a string or a map of strings")]
    BadMessage {
        /// The offending field.
        field: String,
        /// The offending rule.
        rule: String,
    },
}

// ============================================================================
// RULE SET
// ============================================================================

/// The rules declared on one field: rule name → declaration.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, RuleDecl>,
}

/// One rule's declaration inside a [`RuleSet`].
#[derive(Debug, Clone)]
pub enum RuleDecl {
    /// Explicitly switched off (`false` in the JSON form). The engine skips
    /// the rest of the field's current step and emits a diagnostic.
    Disabled,
    /// A bare flag (`true`) for checkers that take no parameters.
    Flag,
    /// Checker-specific constraints.
    Constraints(Constraints),
}

impl RuleSet {
    /// An empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a rule with constraints.
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, constraints: Constraints) -> Self {
        self.rules
            .insert(name.into(), RuleDecl::Constraints(constraints));
        self
    }

    /// Declares a boolean-only rule (`required`, `email`, ...).
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.rules.insert(name.into(), RuleDecl::Flag);
        self
    }

    /// Declares a rule as intentionally disabled.
    #[must_use]
    pub fn disabled(mut self, name: impl Into<String>) -> Self {
        self.rules.insert(name.into(), RuleDecl::Disabled);
        self
    }

    /// Looks up a rule's declaration.
    #[must_use]
    pub fn get(&self, rule: &str) -> Option<&RuleDecl> {
        self.rules.get(rule)
    }

    /// Iterates rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleDecl)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl RuleDecl {
    /// The declared constraints, when this is a constraints declaration.
    #[must_use]
    pub fn constraints(&self) -> Option<&Constraints> {
        match self {
            Self::Constraints(c) => Some(c),
            Self::Disabled | Self::Flag => None,
        }
    }

    fn from_value(field: &str, rule: &str, value: &Value) -> Result<Self, RuleParseError> {
        match value {
            Value::Bool(true) => Ok(Self::Flag),
            Value::Bool(false) => Ok(Self::Disabled),
            // A bare string is pattern shorthand (used by `format`).
            Value::String(pattern) => Ok(Self::Constraints(
                Constraints::new().param("pattern", pattern.clone()),
            )),
            Value::Object(map) => {
                let mut constraints = Constraints::new();
                for (key, v) in map {
                    match key.as_str() {
                        "message" => constraints.message = Some(parse_message(field, rule, v)?),
                        "fullMessage" => constraints.full_message = v.as_bool(),
                        "capitalize" => constraints.capitalize = v.as_bool(),
                        _ => {
                            constraints.params.insert(key.clone(), v.clone());
                        }
                    }
                }
                Ok(Self::Constraints(constraints))
            }
            _ => Err(RuleParseError::BadRuleDecl {
                field: field.to_string(),
                rule: rule.to_string(),
            }),
        }
    }
}

fn parse_message(field: &str, rule: &str, value: &Value) -> Result<MessageSpec, RuleParseError> {
    match value {
        Value::String(s) => Ok(MessageSpec::Text(s.clone().into())),
        Value::Object(map) => {
            let mut per = IndexMap::with_capacity(map.len());
            for (constraint, v) in map {
                let Value::String(s) = v else {
                    return Err(RuleParseError::BadMessage {
                        field: field.to_string(),
                        rule: rule.to_string(),
                    });
                };
                per.insert(constraint.clone(), MessageSpec::Text(s.clone().into()));
            }
            Ok(MessageSpec::PerConstraint(per))
        }
        _ => Err(RuleParseError::BadMessage {
            field: field.to_string(),
            rule: rule.to_string(),
        }),
    }
}

// ============================================================================
// CONSTRAINTS
// ============================================================================

/// Checker-specific parameters plus presentation overrides for one rule.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub(crate) params: IndexMap<String, Value>,
    pub(crate) message: Option<MessageSpec>,
    pub(crate) full_message: Option<bool>,
    pub(crate) capitalize: Option<bool>,
}

impl Constraints {
    /// Empty constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a checker-specific parameter, e.g. `min` for `length`.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Overrides the error message for this rule.
    #[must_use]
    pub fn message(mut self, message: impl Into<MessageSpec>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Overrides the label-prefix policy for this rule only.
    #[must_use]
    pub fn full_message(mut self, full: bool) -> Self {
        self.full_message = Some(full);
        self
    }

    /// Overrides the capitalization policy for this rule only.
    #[must_use]
    pub fn capitalize(mut self, capitalize: bool) -> Self {
        self.capitalize = Some(capitalize);
        self
    }

    /// A single parameter by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// All parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    /// The declared message override, if any.
    #[must_use]
    pub fn message_spec(&self) -> Option<&MessageSpec> {
        self.message.as_ref()
    }
}

// ============================================================================
// TESTS
// ============================================================================
