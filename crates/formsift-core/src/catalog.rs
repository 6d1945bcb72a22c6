//! Catalogs of named rule constraints and filter transforms.
//!
//! Profiles reference constraints and filters by name, e.g. `"LenMin:5"`
//! or `"Trim"`. Catalogs map those names to factories that produce the
//! actual closures. A profile consults its catalogs in registration
//! order, first match wins, so later catalogs can be shadowed by
//! earlier ones.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::attribute::Attribute;
use crate::error::DefinitionError;
use crate::filter::FilterPosition;
use crate::profile::Profile;
use crate::rule::Rule;

// ─────────────────────────────────────────────────────────────────────
// Closure types
// ─────────────────────────────────────────────────────────────────────

/// A compiled rule predicate. Returns true when the value satisfies it.
pub type Constraint = Arc<dyn Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync>;

/// A compiled filter. Consumes a value and produces its replacement.
pub type Transform = Arc<dyn Fn(Value, &FilterContext<'_>) -> Value + Send + Sync>;

/// Builds a [`Constraint`] from the argument segments of a constraint
/// string. For `"LenMin:5"` the factory registered under `LenMin`
/// receives `["5"]`.
pub type RuleFactory = Arc<dyn Fn(&[String]) -> Result<Constraint, DefinitionError> + Send + Sync>;

/// Builds a [`Transform`] for a named filter.
pub type FilterFactory = Arc<dyn Fn() -> Transform + Send + Sync>;

/// Evaluation context handed to every constraint invocation.
pub struct RuleContext<'a> {
    /// The rule being checked.
    pub rule: &'a Rule,
    /// The attribute owning the rule.
    pub attribute: &'a Attribute,
    /// The profile driving the evaluation.
    pub profile: &'a Profile,
}

/// Evaluation context handed to every filter invocation.
pub struct FilterContext<'a> {
    /// The attribute whose chain is running, if any. Profile-level
    /// chains applied to unknown paths run without an attribute.
    pub attribute: Option<&'a Attribute>,
    /// The profile driving the evaluation.
    pub profile: &'a Profile,
}

// ─────────────────────────────────────────────────────────────────────
// Catalogs
// ─────────────────────────────────────────────────────────────────────

/// A named collection of rule constraint factories.
#[derive(Clone, Default)]
pub struct RuleCatalog {
    name: String,
    entries: IndexMap<String, RuleFactory>,
}

impl RuleCatalog {
    /// Creates an empty catalog with a display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Registers a constraint factory under a name, replacing any
    /// previous entry with that name.
    #[must_use]
    pub fn rule<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[String]) -> Result<Constraint, DefinitionError> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(factory));
        self
    }

    /// The catalog's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all registered constraints, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn get(&self, name: &str) -> Option<&RuleFactory> {
        self.entries.get(name)
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCatalog")
            .field("name", &self.name)
            .field("rules", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A named collection of filter factories.
#[derive(Clone, Default)]
pub struct FilterCatalog {
    name: String,
    entries: IndexMap<String, FilterFactory>,
}

impl FilterCatalog {
    /// Creates an empty catalog with a display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Registers a filter factory under a name, replacing any previous
    /// entry with that name.
    #[must_use]
    pub fn filter<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Transform + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(factory));
        self
    }

    /// The catalog's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all registered filters, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn get(&self, name: &str) -> Option<&FilterFactory> {
        self.entries.get(name)
    }
}

impl fmt::Debug for FilterCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCatalog")
            .field("name", &self.name)
            .field("filters", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The ordered set of catalogs a profile resolves names against.
///
/// A profile holds these behind an `Arc`, and every attribute keeps a
/// clone of that handle so that rules added after construction (and
/// lazy rules resolved at first check) can still look constraints up.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    rules: Vec<RuleCatalog>,
    filters: Vec<FilterCatalog>,
}

impl Catalogs {
    /// Creates an empty catalog set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule catalog, builder style.
    #[must_use]
    pub fn with_rule_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.rules.push(catalog);
        self
    }

    /// Appends a filter catalog, builder style.
    #[must_use]
    pub fn with_filter_catalog(mut self, catalog: FilterCatalog) -> Self {
        self.filters.push(catalog);
        self
    }

    /// Appends a rule catalog in place.
    pub fn push_rule_catalog(&mut self, catalog: RuleCatalog) {
        self.rules.push(catalog);
    }

    /// Appends a filter catalog in place.
    pub fn push_filter_catalog(&mut self, catalog: FilterCatalog) {
        self.filters.push(catalog);
    }

    /// Registered rule catalogs, in consultation order.
    #[must_use]
    pub fn rule_catalogs(&self) -> &[RuleCatalog] {
        &self.rules
    }

    /// Registered filter catalogs, in consultation order.
    #[must_use]
    pub fn filter_catalogs(&self) -> &[FilterCatalog] {
        &self.filters
    }

    /// Resolves a constraint string such as `"LenRange:2:5"` to a
    /// compiled predicate.
    ///
    /// The first `:` separates the constraint name from its arguments.
    /// `rule` and `attribute` only label the error on failure.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownRule`] when no catalog provides the
    /// name, or whatever the factory reports for bad arguments.
    pub fn resolve_rule(
        &self,
        constraint: &str,
        rule: &str,
        attribute: &str,
    ) -> Result<Constraint, DefinitionError> {
        let mut segments = constraint.split(':');
        let name = segments.next().unwrap_or_default();
        let args: Vec<String> = segments.map(str::to_string).collect();

        for catalog in &self.rules {
            if let Some(factory) = catalog.get(name) {
                tracing::trace!(catalog = catalog.name(), constraint, "resolved rule constraint");
                return factory(&args);
            }
        }
        Err(DefinitionError::UnknownRule {
            name: name.to_string(),
            constraint: constraint.to_string(),
            rule: rule.to_string(),
            attribute: attribute.to_string(),
        })
    }

    /// Resolves a filter name to a compiled transform.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownFilter`] when no catalog provides the
    /// name.
    pub fn resolve_filter(
        &self,
        filter: &str,
        owner: &str,
        position: FilterPosition,
    ) -> Result<Transform, DefinitionError> {
        for catalog in &self.filters {
            if let Some(factory) = catalog.get(filter) {
                tracing::trace!(catalog = catalog.name(), filter, "resolved filter");
                return Ok(factory());
            }
        }
        Err(DefinitionError::UnknownFilter {
            filter: filter.to_string(),
            owner: owner.to_string(),
            position,
        })
    }
}
