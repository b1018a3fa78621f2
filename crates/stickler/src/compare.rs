//! Value comparison.
//!
//! A small comparator table shared by the `numeric` and `confirms`
//! checkers and exposed on the engine. Operators come in symbolic form
//! (`>=`) and as named aliases (`greaterThanOrEqualTo`); the alias table is
//! static and built once.
//!
//! Loose comparison coerces numeric strings to numbers (so `"6" == 6`);
//! the strict operators (`===`, `!==`) require matching types first.

use serde_json::Value;

use crate::value::TypeTag;

/// Named aliases for the symbolic comparators.
const ALIASES: [(&str, &str); 6] = [
    ("equalTo", "=="),
    ("notEqualTo", "!="),
    ("greaterThan", ">"),
    ("greaterThanOrEqualTo", ">="),
    ("lessThan", "<"),
    ("lessThanOrEqualTo", "<="),
];

/// Resolves an operator or alias to its canonical symbolic form.
#[must_use]
pub fn canonical(op: &str) -> Option<&'static str> {
    match op {
        "==" => Some("=="),
        "===" => Some("==="),
        "!=" => Some("!="),
        "!==" => Some("!=="),
        ">" => Some(">"),
        ">=" => Some(">="),
        "<" => Some("<"),
        "<=" => Some("<="),
        other => ALIASES
            .iter()
            .find(|(alias, _)| *alias == other)
            .map(|(_, sym)| *sym),
    }
}

/// Numeric view of a value: numbers directly, numeric strings parsed.
///
/// Non-finite results count as non-numeric — a comparison against them
/// fails rather than raising.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Compares two values with the given operator or alias.
///
/// Unknown operators and uncomparable operand combinations evaluate to
/// false with a diagnostic (when `warns` is set) — never a panic.
#[must_use]
pub fn compare(lhs: &Value, op: &str, rhs: &Value, warns: bool) -> bool {
    let Some(op) = canonical(op) else {
        if warns {
            tracing::warn!(comparator = op, "unknown comparator");
        }
        return false;
    };

    if matches!(op, "===" | "!==") {
        let eq = TypeTag::of(lhs) == TypeTag::of(rhs) && content_eq(lhs, rhs);
        return if op == "===" { eq } else { !eq };
    }

    // Numbers (including numeric strings) compare numerically.
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return ordered(op, a.partial_cmp(&b));
    }

    // Two plain strings compare lexicographically.
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return ordered(op, a.partial_cmp(b));
    }

    if TypeTag::of(lhs) != TypeTag::of(rhs) {
        if warns {
            tracing::warn!(
                lhs = %TypeTag::of(lhs),
                rhs = %TypeTag::of(rhs),
                "comparing values with different types"
            );
        }
        return false;
    }

    // Same non-ordered type: only equality is meaningful.
    match op {
        "==" => lhs == rhs,
        "!=" => lhs != rhs,
        _ => {
            if warns {
                tracing::warn!(
                    comparator = op,
                    r#type = %TypeTag::of(lhs),
                    "values of this type can only be compared for equality"
                );
            }
            false
        }
    }
}

/// Strict-equality core: equal content, numbers compared numerically so
/// `5` and `5.0` agree.
fn content_eq(lhs: &Value, rhs: &Value) -> bool {
    match (as_number(lhs), as_number(rhs)) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    }
}

fn ordered(op: &str, cmp: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    let Some(cmp) = cmp else { return false };
    match op {
        "==" => cmp == Equal,
        "!=" => cmp != Equal,
        ">" => cmp == Greater,
        ">=" => cmp != Less,
        "<" => cmp == Less,
        "<=" => cmp != Greater,
        _ => false,
    }
}

/// Compares two already-coerced numbers with an operator or alias.
pub(crate) fn apply_numeric(op: &str, lhs: f64, rhs: f64) -> bool {
    canonical(op).is_some_and(|sym| ordered(sym, lhs.partial_cmp(&rhs)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_resolve() {
        assert_eq!(canonical("greaterThan"), Some(">"));
        assert_eq!(canonical("equalTo"), Some("=="));
        assert_eq!(canonical("~"), None);
    }

    #[test]
    fn loose_comparison_coerces_strings() {
        assert!(compare(&json!("6"), "==", &json!(6), false));
        assert!(compare(&json!("6"), ">", &json!(5), false));
        assert!(!compare(&json!("abc"), ">", &json!(5), false));
    }

    #[test]
    fn strict_comparison_requires_matching_types() {
        assert!(!compare(&json!("5"), "===", &json!(5), false));
        assert!(compare(&json!(5), "===", &json!(5.0), false));
        assert!(compare(&json!("5"), "!==", &json!(5), false));
    }

    #[test]
    fn plain_strings_compare_lexicographically() {
        assert!(compare(&json!("a"), "<", &json!("b"), false));
        assert!(compare(&json!("b"), ">=", &json!("b"), false));
    }

    #[test]
    fn unknown_comparator_is_false() {
        assert!(!compare(&json!(1), "~=", &json!(1), false));
    }

    #[test]
    fn non_ordered_types_only_support_equality() {
        assert!(compare(&json!([1, 2]), "==", &json!([1, 2]), false));
        assert!(!compare(&json!([1, 2]), "<", &json!([1, 3]), false));
        assert!(!compare(&json!([1]), "==", &json!({"a": 1}), false));
    }

    #[test]
    fn as_number_rejects_non_numerics() {
        assert_eq!(as_number(&json!("  42 ")), Some(42.0));
        assert_eq!(as_number(&json!("x")), None);
        assert_eq!(as_number(&json!(true)), None);
    }
}
