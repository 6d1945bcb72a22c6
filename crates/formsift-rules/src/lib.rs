//! Predefined rule and filter catalogs for formsift profiles.
//!
//! [`basic_rules`] covers the constraints most input validation needs:
//! lengths, regexes, numbers, fixed choices, dates and a few common
//! formats like email and URL path parts. [`basic_filters`] adds the
//! matching transforms. Both are plain catalogs; register them on a
//! [`Catalogs`](formsift_core::Catalogs) (the facade crate does this
//! by default) and reference entries by name from profile definitions.

mod choice;
mod filters;
mod length;
mod numeric;
mod pattern;
mod temporal;

use formsift_core::{DefinitionError, FilterCatalog, RuleCatalog};

/// The standard rule catalog: `LenMin`, `LenMax`, `LenRange`, `Regex`,
/// `RegexInverse`, `Number`, `Int`, `Alphanum`, `InArray`, `Date`,
/// `Time`, `DateTime`, `UrlPart`, `UrlPartUnicode` and `Email`.
#[must_use]
pub fn basic_rules() -> RuleCatalog {
    let catalog = RuleCatalog::new("basic");
    let catalog = length::register(catalog);
    let catalog = pattern::register(catalog);
    let catalog = numeric::register(catalog);
    let catalog = choice::register(catalog);
    temporal::register(catalog)
}

/// The standard filter catalog: `Trim`, `WebCompliant` and
/// `WebCompliantUnicode`.
#[must_use]
pub fn basic_filters() -> FilterCatalog {
    filters::register(FilterCatalog::new("basic"))
}

/// Parses a required numeric argument of a constraint string.
pub(crate) fn usize_arg(
    args: &[String],
    index: usize,
    name: &str,
) -> Result<usize, DefinitionError> {
    let constraint = || format!("{name}:{}", args.join(":"));
    let raw = args.get(index).ok_or_else(|| DefinitionError::InvalidRuleArgs {
        constraint: constraint(),
        reason: format!("argument {} is required", index + 1),
    })?;
    raw.parse().map_err(|_| DefinitionError::InvalidRuleArgs {
        constraint: constraint(),
        reason: format!("`{raw}` is not a non-negative integer"),
    })
}
