//! Core evaluation engine for formsift.
//!
//! A [`Profile`] describes what an input record may, must and must not
//! contain: named [`Attribute`]s carry ordered [`Rule`]s, filter
//! chains and dependency maps. Running a profile flattens the nested
//! input into dot-separated paths, routes every path to its attribute
//! (exact match first, then the longest `prefix.*` wildcard) and
//! sorts everything into the four buckets of a [`CheckResult`]:
//! valid, invalid, missing and unknown.
//!
//! Profiles are built either programmatically or from the declarative
//! [`ProfileSpec`] shape, which maps one to one onto JSON or TOML
//! definition files. Named constraints and filters are resolved
//! against pluggable [`Catalogs`].
//!
//! This crate ships no predefined constraints or filters; see the
//! companion catalog crate and the facade crate that wires both
//! together.

pub mod attribute;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod profile;
pub mod result;
pub mod rule;
pub mod spec;
pub mod util;

pub use attribute::{Attribute, CheckOutcome, DEFAULT_RULE};
pub use catalog::{
    Catalogs, Constraint, FilterCatalog, FilterContext, FilterFactory, RuleCatalog, RuleContext,
    RuleFactory, Transform,
};
pub use error::DefinitionError;
pub use filter::{FilterChain, FilterPosition};
pub use flatten::flatten;
pub use profile::{
    Profile, DEFAULT_ERROR_TEMPLATE, DEFAULT_MISSING_TEMPLATE, DEFAULT_SEPARATOR,
};
pub use result::{CheckResult, InvalidEntry, MissingEntry, ValidEntry};
pub use rule::Rule;
pub use spec::{
    AttributeDef, AttributeSpec, ConstraintSpec, ErrorSpec, FilterSpec, ProfileSpec, RuleDef,
    RuleSpec,
};
