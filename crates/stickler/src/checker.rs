//! Checker definitions.
//!
//! A checker bundles the validation predicate(s) for one rule name with an
//! optional preprocessing gate, the constraint types it accepts (consumed by
//! the rule-shape validator) and its built-in messages.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::message::MessageSpec;
use crate::typerule::TypeRule;

/// A validation predicate: true means the value passes.
///
/// Predicates report pass/fail only — they never transform the value.
pub type Predicate = Arc<dyn Fn(&Value, &Context<'_>) -> bool + Send + Sync>;

// ============================================================================
// VALIDATE FUNCTION
// ============================================================================

/// How a checker validates: one predicate for the whole rule, or one per
/// constraint sub-name (so `length` can fail `min` and `max` independently).
#[derive(Clone)]
pub enum ValidateFn {
    /// A single predicate for the whole rule.
    Rule(Predicate),
    /// One predicate per constraint name.
    PerConstraint(IndexMap<String, Predicate>),
}

impl fmt::Debug for ValidateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(_) => f.write_str("Rule(..)"),
            Self::PerConstraint(map) => {
                let mut dbg = f.debug_set();
                for name in map.keys() {
                    dbg.entry(name);
                }
                dbg.finish()
            }
        }
    }
}

// ============================================================================
// CHECKER
// ============================================================================

/// A registered validation rule implementation.
#[derive(Clone)]
pub struct Checker {
    pub(crate) validate: ValidateFn,
    pub(crate) preprocess: Option<Predicate>,
    pub(crate) types: Option<TypeRule>,
    pub(crate) message: Option<MessageSpec>,
    pub(crate) preprocess_message: Option<MessageSpec>,
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("validate", &self.validate)
            .field("preprocess", &self.preprocess.as_ref().map(|_| "..."))
            .field("types", &self.types)
            .field("message", &self.message)
            .field("preprocess_message", &self.preprocess_message)
            .finish()
    }
}

impl Checker {
    /// A checker with a single whole-rule predicate.
    pub fn new<F>(validate: F) -> Self
    where
        F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            validate: ValidateFn::Rule(Arc::new(validate)),
            preprocess: None,
            types: None,
            message: None,
            preprocess_message: None,
        }
    }

    /// A checker validating each declared constraint independently.
    #[must_use]
    pub fn per_constraint() -> Self {
        Self {
            validate: ValidateFn::PerConstraint(IndexMap::new()),
            preprocess: None,
            types: None,
            message: None,
            preprocess_message: None,
        }
    }

    /// Adds a predicate for one constraint name.
    ///
    /// # Panics
    ///
    /// Panics when called on a whole-rule checker built with [`Checker::new`].
    #[must_use]
    pub fn constraint<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        match &mut self.validate {
            ValidateFn::PerConstraint(map) => {
                map.insert(name.into(), Arc::new(predicate));
            }
            ValidateFn::Rule(_) => {
                panic!("constraint predicates only apply to per-constraint checkers")
            }
        }
        self
    }

    /// Gates validation on a structural precondition.
    ///
    /// When the predicate returns false the checker records a single
    /// `preprocess` failure instead of running `validate` — the way for a
    /// checker to refuse structurally wrong values (a non-string for
    /// `email`, say) without raising.
    #[must_use]
    pub fn preprocess<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        self.preprocess = Some(Arc::new(predicate));
        self
    }

    /// Declares the constraint types this checker accepts (consumed by the
    /// rule-shape validator).
    #[must_use]
    pub fn types(mut self, types: TypeRule) -> Self {
        self.types = Some(types);
        self
    }

    /// The checker's built-in failure message.
    #[must_use]
    pub fn message(mut self, message: impl Into<MessageSpec>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The message used when the preprocessing gate rejects a value.
    #[must_use]
    pub fn preprocess_message(mut self, message: impl Into<MessageSpec>) -> Self {
        self.preprocess_message = Some(message.into());
        self
    }

    /// How this checker validates.
    #[must_use]
    pub fn validate_fn(&self) -> &ValidateFn {
        &self.validate
    }

    /// The declared constraint types, if any.
    #[must_use]
    pub fn declared_types(&self) -> Option<&TypeRule> {
        self.types.as_ref()
    }
}

#[cfg(test)]
impl Checker {
    pub(crate) fn check(&self, value: &Value, ctx: &Context<'_>) -> bool {
        match &self.validate {
            ValidateFn::Rule(f) => f(value, ctx),
            ValidateFn::PerConstraint(_) => panic!("checker validates per constraint"),
        }
    }

    pub(crate) fn check_constraint(&self, name: &str, value: &Value, ctx: &Context<'_>) -> bool {
        match &self.validate {
            ValidateFn::PerConstraint(map) => map[name](value, ctx),
            ValidateFn::Rule(_) => panic!("checker validates whole rules"),
        }
    }

    pub(crate) fn check_preprocess(&self, value: &Value, ctx: &Context<'_>) -> bool {
        self.preprocess.as_ref().is_none_or(|f| f(value, ctx))
    }
}

// A bare predicate registers as a whole-rule checker.
impl<F> From<F> for Checker
where
    F: Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}
