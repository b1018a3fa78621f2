//! `length` — the value's length must satisfy `is` / `min` / `max`.
//!
//! Length is the number of characters for strings and the element count
//! for arrays. Each declared bound is checked independently, so a
//! misconfigured `{min: 10, max: 2}` reports both.

use serde_json::Value;

use crate::checker::Checker;
use crate::compare::as_number;
use crate::context::Context;
use crate::typerule::{Shape, TypeRule};
use crate::value::TypeTag;

fn measured(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn bound(value: &Value, ctx: &Context<'_>, key: &str, cmp: fn(f64, f64) -> bool) -> bool {
    let Some(len) = measured(value) else {
        return false;
    };
    let Some(n) = ctx.param(key).and_then(as_number) else {
        return false;
    };
    cmp(len as f64, n)
}

pub(crate) fn checker() -> Checker {
    Checker::per_constraint()
        .constraint("is", |value, ctx| bound(value, ctx, "is", |len, n| len == n))
        .constraint("min", |value, ctx| bound(value, ctx, "min", |len, n| len >= n))
        .constraint("max", |value, ctx| bound(value, ctx, "max", |len, n| len <= n))
        .preprocess(|value, _| measured(value).is_some())
        .preprocess_message("^values checked for length must be strings or arrays, given: %{value}")
        .types(Shape::new().all(TypeRule::tag(TypeTag::Number)).into())
}
