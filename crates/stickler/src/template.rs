//! Message templates.
//!
//! A template is an ordinary string with `%{name}` placeholders. Rendering
//! substitutes each placeholder from a flat replacement map; placeholders
//! with no replacement are left untouched (with a diagnostic) so a half
//! configured message degrades visibly instead of silently. Rendered output
//! is never re-scanned, so replacement values cannot inject placeholders.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;

/// Replacement map for [`render`]: placeholder identifier → value.
pub type Replacements = IndexMap<String, Value>;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{([\w.]+)\}").expect("placeholder pattern is valid"));

/// Renders `%{name}` placeholders in `template` from `replacements`.
///
/// Values are coerced with [`display_value`]: strings verbatim, everything
/// else in its canonical JSON text form.
#[must_use]
pub fn render(template: &str, replacements: &Replacements) -> String {
    render_with(template, replacements, true)
}

pub(crate) fn render_with(template: &str, replacements: &Replacements, warns: bool) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            match replacements.get(&caps[1]) {
                Some(value) => display_value(value),
                None => {
                    if warns {
                        tracing::warn!(
                            placeholder = &caps[0],
                            template,
                            "no replacement for placeholder"
                        );
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Human-facing text form of a value: strings verbatim, other values as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Uppercases the first character of a string.
#[must_use]
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn replacements(pairs: &[(&str, Value)]) -> Replacements {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn substitutes_defined_placeholders() {
        let r = replacements(&[("x", json!("Y"))]);
        assert_eq!(render("a %{x} b", &r), "a Y b");
    }

    #[test]
    fn keeps_unknown_placeholders() {
        let r = replacements(&[]);
        assert_eq!(render("a %{x} b", &r), "a %{x} b");
    }

    #[test]
    fn identity_without_placeholders() {
        let r = replacements(&[("x", json!(1))]);
        assert_eq!(render("plain text", &r), "plain text");
    }

    #[test]
    fn coerces_non_string_values() {
        let r = replacements(&[("min", json!(3)), ("ok", json!(true))]);
        assert_eq!(render("%{min} and %{ok}", &r), "3 and true");
    }

    #[test]
    fn no_recursive_expansion() {
        let r = replacements(&[("a", json!("%{b}")), ("b", json!("boom"))]);
        assert_eq!(render("%{a}", &r), "%{b}");
    }

    #[test]
    fn dotted_identifiers() {
        let r = replacements(&[("a.b", json!("v"))]);
        assert_eq!(render("%{a.b}", &r), "v");
    }

    #[test]
    fn ucfirst_basics() {
        assert_eq!(ucfirst("hello"), "Hello");
        assert_eq!(ucfirst(""), "");
        assert_eq!(ucfirst("éclair"), "Éclair");
    }
}
