//! Recursive type descriptors for constraint declarations.
//!
//! A [`TypeRule`] describes which shapes a checker accepts for its
//! constraints; the rule-shape validator compares declared constraint values
//! against it. Purely diagnostic machinery — nothing here affects validation
//! results.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::value::{TypeTag, classify};

/// A predicate over a declared constraint value.
pub type TypePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// ============================================================================
// TYPE RULE
// ============================================================================

/// A recursive description of allowed constraint shapes.
#[derive(Clone)]
pub enum TypeRule {
    /// Exact classifier match.
    Tag(TypeTag),
    /// Any of the alternatives (OR). When an alternative is itself a list
    /// and the value is an array, every element of the value must satisfy
    /// that list.
    AnyOf(Vec<TypeRule>),
    /// An arbitrary predicate; must cover all cases itself.
    Predicate(TypePredicate),
    /// A keyed shape: per-key rules plus wildcards.
    Shape(Shape),
}

impl TypeRule {
    /// Rule accepting exactly one type.
    #[must_use]
    pub fn tag(tag: TypeTag) -> Self {
        Self::Tag(tag)
    }

    /// Rule accepting any of the alternatives.
    #[must_use]
    pub fn any_of(rules: impl IntoIterator<Item = TypeRule>) -> Self {
        Self::AnyOf(rules.into_iter().collect())
    }

    /// Rule delegating to a predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "Tag({tag})"),
            Self::AnyOf(rules) => f.debug_tuple("AnyOf").field(rules).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Shape(shape) => fmt::Debug::fmt(shape, f),
        }
    }
}

// ============================================================================
// SHAPE
// ============================================================================

/// Per-key type rules for object-shaped constraints.
///
/// Key resolution order: an exact field rule, then `all`, then `others`.
/// `all` declares one rule for every key; `others` is the fallback for keys
/// without their own rule.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: IndexMap<String, TypeRule>,
    all: Option<Box<TypeRule>>,
    others: Option<Box<TypeRule>>,
}

impl Shape {
    /// An empty shape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rule for one key.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: TypeRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Declares one rule for every key.
    #[must_use]
    pub fn all(mut self, rule: TypeRule) -> Self {
        self.all = Some(Box::new(rule));
        self
    }

    /// Declares the fallback rule for keys without their own.
    #[must_use]
    pub fn others(mut self, rule: TypeRule) -> Self {
        self.others = Some(Box::new(rule));
        self
    }

    fn rule_for(&self, key: &str) -> Option<&TypeRule> {
        self.fields
            .get(key)
            .or(self.all.as_deref())
            .or(self.others.as_deref())
    }
}

impl From<Shape> for TypeRule {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

// ============================================================================
// CHECKING
// ============================================================================

/// Checks a value against a type rule.
pub fn check_type(value: &Value, rule: &TypeRule) -> bool {
    match rule {
        TypeRule::Tag(tag) => classify(value) == *tag,
        TypeRule::AnyOf(rules) => rules.iter().any(|alt| match (alt, value) {
            // Positional special case: a nested list against an array value
            // means "every element satisfies the list".
            (TypeRule::AnyOf(_), Value::Array(items)) => {
                items.iter().all(|item| check_type(item, alt))
            }
            _ => check_type(value, alt),
        }),
        TypeRule::Predicate(f) => f(value),
        TypeRule::Shape(shape) => {
            let Value::Object(map) = value else {
                // Nothing keyed to compare; null is vacuously fine.
                return value.is_null();
            };
            map.iter().all(|(key, v)| match shape.rule_for(key) {
                Some(rule) => check_type(v, rule),
                None => {
                    tracing::warn!(key = %key, "no type rule for constraint key");
                    true
                }
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
