//! Checker registry.
//!
//! Checkers are grouped into named, ordered *steps*; within a step every
//! applicable rule runs, and a field that fails a step never reaches the
//! next one. The registry is the runtime-mutable table behind
//! (step, rule name) → checker dispatch.
//!
//! Each engine instance owns its registry, cloned from the shared built-in
//! table, so custom checkers on one instance never leak into another.

use indexmap::IndexMap;

use crate::checker::Checker;

/// Step checkers land in when none is given.
pub const DEFAULT_STEP: &str = "during";

/// The built-in step order: `before` (emptiness and cross-field checks),
/// then `during` (content checks).
pub const BUILTIN_STEPS: [&str; 2] = ["before", "during"];

// ============================================================================
// REGISTRY
// ============================================================================

/// Ordered mapping from step → rule name → [`Checker`].
#[derive(Debug, Clone)]
pub struct CheckerRegistry {
    steps: Vec<String>,
    table: IndexMap<String, IndexMap<String, Checker>>,
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckerRegistry {
    /// An empty registry with the built-in step order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: BUILTIN_STEPS.iter().map(ToString::to_string).collect(),
            table: IndexMap::new(),
        }
    }

    /// The step order.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// True when `name` is a known step.
    #[must_use]
    pub fn has_step(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s == name)
    }

    /// Looks up the checker registered for `(step, rule name)`.
    #[must_use]
    pub fn get(&self, step: &str, name: &str) -> Option<&Checker> {
        self.table.get(step)?.get(name)
    }

    /// The step a rule name belongs to, scanning steps in order.
    ///
    /// Emits a diagnostic when no step knows the name.
    #[must_use]
    pub fn step_of(&self, name: &str) -> Option<&str> {
        let found = self
            .steps
            .iter()
            .find(|step| self.table.get(*step).is_some_and(|c| c.contains_key(name)));
        if found.is_none() {
            tracing::warn!(rule = name, "no step found for rule");
        }
        found.map(String::as_str)
    }

    /// Iterates `(step, rule name, checker)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Checker)> {
        self.table.iter().flat_map(|(step, checkers)| {
            checkers
                .iter()
                .map(move |(name, c)| (step.as_str(), name.as_str(), c))
        })
    }

    /// Registers (or overrides) a checker under `name`.
    ///
    /// `step` defaults to [`DEFAULT_STEP`]. A previously unknown step is
    /// appended to the step order — unless `step_order` supplies the full
    /// order explicitly, in which case it replaces the current one. A bare
    /// predicate function registers as a whole-rule checker.
    ///
    /// # Panics
    ///
    /// Panics when `name` is empty: an anonymous checker could never be
    /// referenced from a rule set, so registering one silently drops
    /// validation coverage.
    pub fn register(
        &mut self,
        checker: impl Into<Checker>,
        name: &str,
        step: Option<&str>,
        step_order: Option<Vec<String>>,
    ) {
        assert!(
            !name.is_empty(),
            "checkers must be registered under a non-empty name"
        );
        let step = step.unwrap_or(DEFAULT_STEP);
        if !self.has_step(step) {
            match step_order {
                Some(order) => self.steps = order,
                None => self.steps.push(step.to_string()),
            }
        }
        self.table
            .entry(step.to_string())
            .or_default()
            .insert(name.to_string(), checker.into());
    }

    /// Registers a whole tree of checkers at once.
    ///
    /// Each top-level entry is either one checker (the key is its rule
    /// name, registered under the default step) or a group (the key is a
    /// step name — appended to the step order when new — and the group maps
    /// rule names to checkers).
    pub fn register_bulk(&mut self, tree: IndexMap<String, Registration>) {
        for (key, entry) in tree {
            match entry {
                Registration::Checker(checker) => self.register(checker, &key, None, None),
                Registration::Group(group) => {
                    for (name, checker) in group {
                        self.register(checker, &name, Some(&key), None);
                    }
                }
            }
        }
    }
}

/// One entry in a bulk registration tree.
#[derive(Debug)]
pub enum Registration {
    /// A single checker; the tree key is its rule name.
    Checker(Checker),
    /// A step's checkers; the tree key is the step name.
    Group(IndexMap<String, Checker>),
}

// ============================================================================
// TESTS
// ============================================================================
