//! Declarative validation and filtering of nested input records.
//!
//! A profile describes the attributes an input record may carry, the
//! rules each must satisfy, the filters that clean values up on the
//! way in and out, and what depends on what. Running a profile sorts
//! every input path into valid, invalid, missing or unknown.
//!
//! ```
//! use formsift::compile;
//! use serde_json::json;
//!
//! let profile = compile(serde_json::from_value(json!({
//!     "attribs": {
//!         "username": {
//!             "required": true,
//!             "rules": { "length": "LenRange:3:20", "chars": "UrlPart" },
//!         },
//!         "email": "Email",
//!     }
//! }))?)?;
//!
//! let result = profile.run(&json!({ "username": "worf", "email": "w@example.com" }))?;
//! assert!(!result.has_error());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This crate is the batteries-included surface: profiles compiled
//! here resolve names against the basic rule and filter catalogs.
//! The engine itself lives in `formsift-core`, the catalogs in
//! `formsift-rules`.

mod group;
mod loader;

pub use formsift_core::*;
pub use formsift_rules::{basic_filters, basic_rules};
pub use group::{GroupError, ProfileGroup};
pub use loader::{
    profile_from_file, profile_from_json_file, profile_from_json_str, profile_from_toml_file,
    profile_from_toml_str, LoadError,
};

/// The catalogs profiles compiled by this crate resolve against: the
/// basic rules and filters.
#[must_use]
pub fn default_catalogs() -> Catalogs {
    Catalogs::new()
        .with_rule_catalog(basic_rules())
        .with_filter_catalog(basic_filters())
}

/// Builds a runnable [`Profile`] from a declarative spec, with the
/// basic catalogs available. Catalogs listed in the spec are appended
/// after them, so built-in names cannot be shadowed.
///
/// # Errors
///
/// Any part of the definition that fails to resolve.
pub fn compile(spec: ProfileSpec) -> Result<Profile, DefinitionError> {
    Profile::from_spec(spec, default_catalogs())
}
