//! Engine configuration.
//!
//! [`Config`] carries the tunable surface that is not per-call state: the
//! built-in patterns, the emptiness definition, the default message table
//! and the message composition knobs. All fields are public so a caller can
//! override any of them with struct-update syntax:
//!
//! ```rust
//! use stickler::config::Config;
//!
//! let config = Config {
//!     message_join: " and ".into(),
//!     ..Config::default()
//! };
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::message::MessageSpec;

/// Email pattern (Jan Goyvaerts' regular-expressions.info form).
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
});

/// Confirmation-field naming convention: `<base>_confirmation`.
static CONFIRMATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_confirmation$").expect("confirmation pattern is valid"));

/// Whitespace-only strings count as empty.
static EMPTY_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+$").expect("empty-string pattern is valid"));

// ============================================================================
// CONFIG
// ============================================================================

/// Engine-level configuration, merged field-wise over the defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Recognizes confirmation fields for the shorthand rule.
    pub confirmation_re: Regex,
    /// Accepted by the `email` checker.
    pub email_re: Regex,
    /// Strings matching this pattern count as empty.
    pub empty_string_re: Regex,
    /// Additional values that count as empty for `required`.
    pub empty_values: Vec<Value>,
    /// Default message per rule name, used when neither the declaration nor
    /// the checker supplies one.
    pub messages: IndexMap<String, MessageSpec>,
    /// Joins the messages of a rule that failed several constraints.
    pub message_join: Cow<'static, str>,
    /// Leading sentinel that suppresses the label prefix on a message.
    pub no_label_char: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirmation_re: CONFIRMATION_RE.clone(),
            email_re: EMAIL_RE.clone(),
            empty_string_re: EMPTY_STRING_RE.clone(),
            empty_values: vec![Value::Null, Value::String("undefined".into())],
            messages: default_messages(),
            message_join: Cow::Borrowed(", "),
            no_label_char: '^',
        }
    }
}

impl Config {
    /// The shared default configuration.
    #[must_use]
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<Config> = LazyLock::new(Config::default);
        &SHARED
    }

    /// Whether a value counts as empty: null, empty or whitespace-only
    /// strings, empty arrays, empty objects, and anything listed in
    /// [`Config::empty_values`].
    #[must_use]
    pub fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s.is_empty() || self.empty_string_re.is_match(s),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            other => self.empty_values.contains(other),
        }
    }
}

/// The built-in fallback message table.
///
/// `format` deliberately has no entry — a failing `format` rule without a
/// declared message falls back to the invariant default.
fn default_messages() -> IndexMap<String, MessageSpec> {
    let mut messages = IndexMap::new();
    messages.insert(
        "confirms".to_string(),
        MessageSpec::from("should be the same as %{field}"),
    );
    messages.insert("required".to_string(), MessageSpec::from("is required"));
    messages.insert("email".to_string(), MessageSpec::from("is not a valid email"));
    messages.insert(
        "length".to_string(),
        MessageSpec::func(|ctx, _| {
            let params = ctx.constraints().map(crate::rules::Constraints::params);
            let has = |key: &str| params.is_some_and(|p| p.contains_key(key));
            if has("is") {
                "must be exactly %{is} characters long".to_string()
            } else if has("min") && has("max") {
                "must be between %{min} and %{max} characters long".to_string()
            } else if has("min") {
                "must be minimum %{min} characters long".to_string()
            } else if has("max") {
                "must be maximum %{max} characters long".to_string()
            } else {
                crate::message::NOT_VALID.to_string()
            }
        }),
    );
    messages.insert(
        "numeric".to_string(),
        MessageSpec::per_constraint([
            ("onlyInteger", "must be an integer"),
            ("noStrings", "strings are not allowed"),
            ("equalTo", "must be equal to %{equalTo}"),
            ("notEqualTo", "must not be equal to %{notEqualTo}"),
            ("greaterThan", "must be greater than %{greaterThan}"),
            (
                "greaterThanOrEqualTo",
                "must be greater than or equal to %{greaterThanOrEqualTo}",
            ),
            ("lessThan", "must be less than %{lessThan}"),
            (
                "lessThanOrEqualTo",
                "must be less than or equal to %{lessThanOrEqualTo}",
            ),
        ]),
    );
    messages
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emptiness() {
        let config = Config::default();
        assert!(config.is_empty(&json!(null)));
        assert!(config.is_empty(&json!("")));
        assert!(config.is_empty(&json!("  \t\n")));
        assert!(config.is_empty(&json!([])));
        assert!(config.is_empty(&json!({})));
        assert!(config.is_empty(&json!("undefined")));
        assert!(!config.is_empty(&json!("v")));
        assert!(!config.is_empty(&json!(0)));
        assert!(!config.is_empty(&json!(false)));
    }

    #[test]
    fn email_pattern() {
        let config = Config::default();
        assert!(config.email_re.is_match("user@example.com"));
        assert!(config.email_re.is_match("USER.NAME+tag@sub.example.cc"));
        assert!(!config.email_re.is_match("not-an-email"));
        assert!(!config.email_re.is_match("user@host"));
    }

    #[test]
    fn confirmation_pattern() {
        let config = Config::default();
        let caps = config.confirmation_re.captures("password_confirmation").unwrap();
        assert_eq!(&caps[1], "password");
        assert!(!config.confirmation_re.is_match("password"));
    }
}
