//! Value classification.
//!
//! Every value the engine touches is a [`serde_json::Value`]; this module
//! assigns each one a semantic [`TypeTag`] used by the emptiness check and
//! by the rule-shape validator.

use std::fmt;

use serde_json::Value;

/// A flat data record: field name → value, in insertion order.
pub type Record = indexmap::IndexMap<String, Value>;

// ============================================================================
// TYPE TAG
// ============================================================================

/// Semantic type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Explicit null.
    Null,
    /// `true` / `false`.
    Boolean,
    /// Any JSON number.
    Number,
    /// A string.
    String,
    /// An ordered sequence.
    Array,
    /// A string-keyed map.
    Object,
}

impl TypeTag {
    /// Classifies a value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// The lowercase tag name, as it appears in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a value into its [`TypeTag`].
#[must_use]
pub fn classify(value: &Value) -> TypeTag {
    TypeTag::of(value)
}

// ============================================================================
// TYPE MEMBERSHIP
// ============================================================================

/// Checks whether a value is one of the given types (OR semantics).
///
/// On mismatch a diagnostic is emitted when `warns` is set; the check never
/// fails fatally, so callers are free to ignore the result.
#[must_use]
pub fn is_of_type(types: &[TypeTag], value: &Value, warns: bool) -> bool {
    let actual = TypeTag::of(value);
    let res = types.contains(&actual);
    if !res && warns {
        let expected = types
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(
            expected = %expected,
            given = actual.name(),
            "value is not of the expected type"
        );
    }
    res
}

/// Checks whether a value is a number, warning on mismatch when `warns` is set.
#[must_use]
pub fn is_number(value: &Value, warns: bool) -> bool {
    is_of_type(&[TypeTag::Number], value, warns)
}

/// Checks whether a value is a string, warning on mismatch when `warns` is set.
#[must_use]
pub fn is_string(value: &Value, warns: bool) -> bool {
    is_of_type(&[TypeTag::String], value, warns)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_every_tag() {
        assert_eq!(classify(&json!(null)), TypeTag::Null);
        assert_eq!(classify(&json!(true)), TypeTag::Boolean);
        assert_eq!(classify(&json!(3.5)), TypeTag::Number);
        assert_eq!(classify(&json!("s")), TypeTag::String);
        assert_eq!(classify(&json!([1, 2])), TypeTag::Array);
        assert_eq!(classify(&json!({"a": 1})), TypeTag::Object);
    }

    #[test]
    fn is_of_type_accepts_alternatives() {
        assert!(is_of_type(&[TypeTag::String, TypeTag::Number], &json!(5), false));
        assert!(is_of_type(&[TypeTag::String, TypeTag::Number], &json!("5"), false));
        assert!(!is_of_type(&[TypeTag::String, TypeTag::Number], &json!([]), false));
    }

    #[test]
    fn convenience_wrappers() {
        assert!(is_number(&json!(1), false));
        assert!(!is_number(&json!("1"), false));
        assert!(is_string(&json!("x"), false));
        assert!(!is_string(&json!(1), false));
    }
}
