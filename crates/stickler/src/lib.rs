//! # stickler
//!
//! A declarative, synchronous validation engine for flat data records:
//! hand it a record and a set of per-field rules, get back `Ok(())` or a
//! map of human-readable per-field error messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use stickler::prelude::*;
//!
//! let rules = Rules::new()
//!     .field("email", RuleSet::new().flag("required").flag("email"))
//!     .field(
//!         "age",
//!         RuleSet::new().rule("numeric", Constraints::new().param("greaterThan", 17)),
//!     );
//!
//! let mut engine = Engine::new(rules, Options::default());
//!
//! assert!(engine.validate(&record! { "email" => "a@b.com", "age" => 30 }).is_ok());
//!
//! let errors = engine
//!     .validate(&record! { "email" => "nope", "age" => 12 })
//!     .unwrap_err();
//! assert_eq!(errors.get("email").unwrap(), ["Is not a valid email"]);
//! ```
//!
//! ## How validation runs
//!
//! Checkers are grouped into ordered *steps* (`before`, then `during`, plus
//! any custom-registered ones). Within a step every applicable rule runs
//! and failures accumulate; a field that failed a step skips the remaining
//! steps. Messages resolve from the rule declaration, then the checker,
//! then the fallback table, and render `%{placeholder}` templates against
//! the value, the field label and the rule's constraint parameters.
//!
//! ## Extending
//!
//! Custom checkers are plain predicates registered under a rule name (and
//! optionally a custom step) with [`Engine::register_checker`]; each engine
//! owns its registry, so instances never interfere.
//!
//! Rules can equally be loaded from JSON via [`Rules::from_value`] — see
//! [`rules`] for the wire shape.

pub mod checker;
mod checkers;
pub mod compare;
pub mod config;
pub mod context;
mod devtools;
pub mod engine;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod template;
pub mod typerule;
pub mod value;

pub use checker::{Checker, Predicate, ValidateFn};
pub use config::Config;
pub use context::Context;
pub use engine::{Engine, Errors, Options};
pub use message::{MessageSpec, NOT_VALID};
pub use registry::{CheckerRegistry, Registration};
pub use rules::{Constraints, FieldRules, RuleDecl, RuleSet, Rules};
pub use template::{Replacements, render};
pub use typerule::{Shape, TypeRule};
pub use value::{Record, TypeTag, classify, is_of_type};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether a value counts as empty under the default configuration.
///
/// See [`Config::is_empty`] for the definition (and for checking under a
/// customized emptiness configuration).
#[must_use]
pub fn is_empty(value: &serde_json::Value) -> bool {
    Config::shared().is_empty(value)
}

/// A fresh copy of the built-in checker table, as new engines receive it.
#[must_use]
pub fn builtin_checkers() -> CheckerRegistry {
    checkers::builtin()
}

/// Builds a [`Record`] from `key => value` pairs; values go through
/// [`serde_json::json!`].
///
/// ```rust
/// use stickler::record;
///
/// let data = record! { "name" => "ada", "age" => 36 };
/// assert_eq!(data["age"], 36);
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(
                ::std::string::String::from($key),
                $crate::__serde_json::json!($value),
            );
        )+
        record
    }};
}
