//! Everything a consumer needs for common validation scenarios.
//!
//! ```rust
//! use stickler::prelude::*;
//! ```

pub use crate::checker::Checker;
pub use crate::config::Config;
pub use crate::context::Context;
pub use crate::engine::{Engine, Errors, Options};
pub use crate::message::MessageSpec;
pub use crate::record;
pub use crate::registry::{CheckerRegistry, Registration};
pub use crate::rules::{Constraints, FieldRules, RuleDecl, RuleSet, Rules};
pub use crate::typerule::{Shape, TypeRule};
pub use crate::value::{Record, TypeTag};
