//! Filter chains attached to profiles and attributes.

use std::fmt;

use serde_json::Value;

use crate::catalog::{Catalogs, FilterContext, Transform};
use crate::error::DefinitionError;
use crate::spec::FilterSpec;

/// Whether a filter runs before or after rule checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterPosition {
    /// Applied to the raw value before any rule sees it.
    Pre,
    /// Applied to an accepted value before it lands in the result.
    Post,
}

impl fmt::Display for FilterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => f.write_str("pre"),
            Self::Post => f.write_str("post"),
        }
    }
}

/// An ordered pair of transform lists, one per position.
///
/// Filters accumulate: adding more appends to the existing list, it
/// never replaces it. Application folds the value through the list in
/// insertion order.
#[derive(Clone, Default)]
pub struct FilterChain {
    pre: Vec<Transform>,
    post: Vec<Transform>,
}

impl FilterChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends filters at a position, resolving named ones against the
    /// catalogs. `owner` labels resolution errors.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownFilter`] for a name no catalog provides.
    pub fn add(
        &mut self,
        position: FilterPosition,
        specs: impl IntoIterator<Item = FilterSpec>,
        catalogs: &Catalogs,
        owner: &str,
    ) -> Result<(), DefinitionError> {
        let slot = match position {
            FilterPosition::Pre => &mut self.pre,
            FilterPosition::Post => &mut self.post,
        };
        for spec in specs {
            let transform = match spec {
                FilterSpec::Named(name) => catalogs.resolve_filter(&name, owner, position)?,
                FilterSpec::Callback(transform) => transform,
            };
            slot.push(transform);
        }
        Ok(())
    }

    /// Folds a value through all filters at a position, in order.
    #[must_use]
    pub fn apply(&self, position: FilterPosition, value: Value, ctx: &FilterContext<'_>) -> Value {
        let slot = match position {
            FilterPosition::Pre => &self.pre,
            FilterPosition::Post => &self.post,
        };
        slot.iter().fold(value, |value, transform| transform(value, ctx))
    }

    /// True when no filters are registered at the position.
    #[must_use]
    pub fn is_empty(&self, position: FilterPosition) -> bool {
        match position {
            FilterPosition::Pre => self.pre.is_empty(),
            FilterPosition::Post => self.post.is_empty(),
        }
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .finish()
    }
}
