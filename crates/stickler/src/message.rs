//! Error message sources.
//!
//! A message can be declared as plain text, as a function of the current
//! validation [`Context`], or as a map from constraint name to either of
//! those. Resolution picks the first available source in priority order:
//! the rule declaration's own override, then the checker's built-in
//! message, then the global fallback table, then [`NOT_VALID`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::Context;

/// The invariant default message, used when every other source comes up dry.
pub const NOT_VALID: &str = "is not valid.";

/// A message computed from the validation context.
pub type MessageFn = Arc<dyn Fn(&Context<'_>, Option<&str>) -> String + Send + Sync>;

// ============================================================================
// MESSAGE SPEC
// ============================================================================

/// A declared message source.
#[derive(Clone)]
pub enum MessageSpec {
    /// A fixed template string (may contain `%{placeholders}`).
    Text(Cow<'static, str>),
    /// A function of the context and the failing constraint name.
    Func(MessageFn),
    /// Per-constraint messages, e.g. separate texts for `min` and `max`.
    PerConstraint(IndexMap<String, MessageSpec>),
}

impl MessageSpec {
    /// A message computed from the validation context.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>, Option<&str>) -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Builds a per-constraint message map.
    #[must_use]
    pub fn per_constraint<I, K, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<MessageSpec>,
    {
        Self::PerConstraint(
            entries
                .into_iter()
                .map(|(k, m)| (k.into(), m.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for MessageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
            Self::PerConstraint(map) => f.debug_tuple("PerConstraint").field(map).finish(),
        }
    }
}

impl From<&'static str> for MessageSpec {
    fn from(s: &'static str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

impl From<String> for MessageSpec {
    fn from(s: String) -> Self {
        Self::Text(Cow::Owned(s))
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves the message template for a failure.
///
/// Sources are consulted in order; the first defined one wins. When the
/// winning source is a per-constraint map, it is indexed by `constraint` —
/// a missing entry resolves to [`NOT_VALID`] rather than falling through to
/// a later source.
pub(crate) fn resolve_template(
    sources: [Option<&MessageSpec>; 3],
    ctx: &Context<'_>,
    constraint: Option<&str>,
) -> String {
    let Some(spec) = sources.into_iter().flatten().next() else {
        return NOT_VALID.to_string();
    };
    match spec {
        MessageSpec::Text(t) => t.to_string(),
        MessageSpec::Func(f) => f(ctx, constraint),
        MessageSpec::PerConstraint(map) => constraint
            .and_then(|c| map.get(c))
            .map_or_else(
                || NOT_VALID.to_string(),
                |inner| match inner {
                    MessageSpec::Text(t) => t.to_string(),
                    MessageSpec::Func(f) => f(ctx, constraint),
                    // Nested maps have no meaning; degrade to the default.
                    MessageSpec::PerConstraint(_) => NOT_VALID.to_string(),
                },
            ),
    }
}
