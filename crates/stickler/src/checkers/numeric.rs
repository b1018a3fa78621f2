//! `numeric` — numeric bounds and properties.
//!
//! Relational constraints (`equalTo`, `greaterThan`, ...) go through the
//! comparator alias table; values coerce from numeric strings unless
//! `noStrings` forbids it. Unparsable and non-finite values fail their
//! constraint, they never raise.

use serde_json::Value;

use crate::checker::Checker;
use crate::compare::{as_number, apply_numeric};
use crate::context::Context;
use crate::typerule::{Shape, TypeRule};
use crate::value::TypeTag;

const RELATIONAL: [&str; 6] = [
    "equalTo",
    "notEqualTo",
    "greaterThan",
    "greaterThanOrEqualTo",
    "lessThan",
    "lessThanOrEqualTo",
];

fn relational(name: &'static str) -> impl Fn(&Value, &Context<'_>) -> bool {
    move |value, ctx| {
        let (Some(lhs), Some(rhs)) = (as_number(value), ctx.param(name).and_then(as_number)) else {
            return false;
        };
        apply_numeric(name, lhs, rhs)
    }
}

pub(crate) fn checker() -> Checker {
    let mut checker = Checker::per_constraint();
    for name in RELATIONAL {
        checker = checker.constraint(name, relational(name));
    }
    checker
        .constraint("noStrings", |value, _| !value.is_string())
        .constraint("onlyInteger", |value, _| {
            as_number(value).is_some_and(|n| n.fract() == 0.0)
        })
        .preprocess(|value, _| value.is_string() || value.is_number())
        .preprocess_message("^values checked for numeric must be strings or numbers, given: %{value}")
        .types(
            Shape::new()
                .field("noStrings", TypeRule::tag(TypeTag::Boolean))
                .field("onlyInteger", TypeRule::tag(TypeTag::Boolean))
                .others(TypeRule::tag(TypeTag::Number))
                .into(),
        )
}
