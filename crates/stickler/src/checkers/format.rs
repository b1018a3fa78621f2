//! `format` — the value must match a caller-supplied pattern.
//!
//! Constraints: `{pattern: "<regex>"}`, or a bare pattern string in the
//! JSON rule form. Patterns are compiled per invocation; an invalid
//! pattern fails the rule with a diagnostic instead of raising.

use std::borrow::Cow;

use regex::Regex;
use serde_json::Value;

use crate::checker::Checker;
use crate::typerule::{Shape, TypeRule};
use crate::value::TypeTag;

pub(crate) fn checker() -> Checker {
    Checker::new(|value, ctx| {
        let Some(pattern) = ctx.param("pattern").and_then(Value::as_str) else {
            tracing::warn!(field = ctx.field_name, "format rule needs a `pattern` string");
            return false;
        };
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(error) => {
                tracing::warn!(%error, pattern, "invalid format pattern");
                return false;
            }
        };
        let text: Cow<'_, str> = match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            _ => return false,
        };
        re.is_match(&text)
    })
    .preprocess(|value, _| value.is_string() || value.is_number())
    .preprocess_message("^values checked for format must be strings or numbers, given: %{value}")
    .types(TypeRule::any_of([
        TypeRule::tag(TypeTag::String),
        Shape::new()
            .field("pattern", TypeRule::tag(TypeTag::String))
            .into(),
    ]))
}
