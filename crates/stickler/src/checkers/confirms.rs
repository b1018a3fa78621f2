//! `confirms` — the value must equal another field's value.
//!
//! Constraints: `{field: "<other>", strict?: bool}`. Loose comparison by
//! default (`"5"` confirms `5`); `strict` also requires matching types.

use serde_json::Value;

use crate::checker::Checker;
use crate::compare;
use crate::typerule::{Shape, TypeRule};
use crate::value::TypeTag;

const NULL: Value = Value::Null;

pub(crate) fn checker() -> Checker {
    Checker::new(|value, ctx| {
        let Some(constraints) = ctx.constraints() else {
            return false;
        };
        let Some(other_field) = constraints.get("field").and_then(Value::as_str) else {
            return false;
        };
        let other = ctx.data.get(other_field).unwrap_or(&NULL);
        let strict = constraints
            .get("strict")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        compare::compare(value, if strict { "===" } else { "==" }, other, false)
    })
    .types(TypeRule::any_of([
        TypeRule::tag(TypeTag::Boolean),
        Shape::new()
            .field("field", TypeRule::tag(TypeTag::String))
            .field("strict", TypeRule::tag(TypeTag::Boolean))
            .into(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::testutil::Fixture;
    use crate::record;
    use crate::rules::{Constraints, RuleSet};
    use serde_json::json;

    fn fixture(strict: bool) -> Fixture {
        let mut constraints = Constraints::new().param("field", "other");
        if strict {
            constraints = constraints.param("strict", true);
        }
        Fixture::new(RuleSet::new().rule("confirms", constraints))
            .with_data(record! { "other" => "value" })
    }

    #[test]
    fn confirms_matching_field() {
        let f = fixture(false);
        let value = json!("value");
        assert!(checker().check(&value, &f.context(&value, "confirms")));
    }

    #[test]
    fn rejects_differing_field() {
        let f = fixture(false);
        let value = json!("something else");
        assert!(!checker().check(&value, &f.context(&value, "confirms")));
    }

    #[test]
    fn loose_comparison_coerces() {
        let f = Fixture::new(RuleSet::new().rule("confirms", Constraints::new().param("field", "other")))
            .with_data(record! { "other" => 5 });
        let value = json!("5");
        assert!(checker().check(&value, &f.context(&value, "confirms")));
    }

    #[test]
    fn strict_comparison_requires_same_type() {
        let f = Fixture::new(
            RuleSet::new().rule(
                "confirms",
                Constraints::new().param("field", "other").param("strict", true),
            ),
        )
        .with_data(record! { "other" => 5 });
        let value = json!("5");
        assert!(!checker().check(&value, &f.context(&value, "confirms")));
        let value = json!(5);
        assert!(checker().check(&value, &f.context(&value, "confirms")));
    }

    #[test]
    fn missing_other_field_compares_against_null() {
        let f = Fixture::new(RuleSet::new().rule("confirms", Constraints::new().param("field", "gone")));
        let value = json!("value");
        assert!(!checker().check(&value, &f.context(&value, "confirms")));
    }
}
