//! Validation profiles: named attribute sets with shared catalogs,
//! filter chains and message templates.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::attribute::Attribute;
use crate::catalog::Catalogs;
use crate::error::DefinitionError;
use crate::filter::{FilterChain, FilterPosition};
use crate::result::CheckResult;
use crate::spec::{AttributeSpec, FilterSpec, ProfileSpec};

/// Error template used when neither rule nor attribute provide one.
pub const DEFAULT_ERROR_TEMPLATE: &str = "Attribute \":attrib:\" does not match \":rule:\"";

/// Missing-message template used when the attribute provides none.
pub const DEFAULT_MISSING_TEMPLATE: &str = "Attribute \":attrib:\" is missing";

/// Path separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = ".";

/// A complete validation profile.
///
/// Evaluation is read-only: [`Profile::run`] borrows the profile
/// immutably and returns an owned [`CheckResult`], so one profile can
/// serve concurrent checks.
pub struct Profile {
    attribs: IndexMap<String, Attribute>,
    catalogs: Arc<Catalogs>,
    filters: FilterChain,
    error_template: String,
    missing_template: String,
    separator: String,
}

impl Profile {
    /// Creates an empty profile over the given catalogs, for
    /// programmatic construction.
    #[must_use]
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            attribs: IndexMap::new(),
            catalogs: Arc::new(catalogs),
            filters: FilterChain::new(),
            error_template: DEFAULT_ERROR_TEMPLATE.to_string(),
            missing_template: DEFAULT_MISSING_TEMPLATE.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Builds a profile from a declarative spec. Catalogs listed in
    /// the spec are appended after the base ones passed here, so on a
    /// name clash the base entry wins.
    ///
    /// # Errors
    ///
    /// The first attribute, rule or filter of the definition that
    /// fails to resolve.
    pub fn from_spec(spec: ProfileSpec, base: Catalogs) -> Result<Self, DefinitionError> {
        let mut catalogs = base;
        for catalog in spec.rule_catalogs {
            catalogs.push_rule_catalog(catalog);
        }
        for catalog in spec.filter_catalogs {
            catalogs.push_filter_catalog(catalog);
        }

        let mut profile = Self::new(catalogs);
        if let Some(template) = spec.error_template {
            profile.error_template = template;
        }
        if let Some(template) = spec.missing_template {
            profile.missing_template = template;
        }
        if let Some(separator) = spec.separator {
            profile.separator = separator;
        }
        profile.add_filters(FilterPosition::Pre, spec.pre_filters)?;
        profile.add_filters(FilterPosition::Post, spec.post_filters)?;
        for (name, attrib_spec) in spec.attribs {
            profile.set_attrib(&name, attrib_spec)?;
        }
        Ok(profile)
    }

    // ─────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────

    /// Adds or replaces an attribute built from a spec.
    ///
    /// # Errors
    ///
    /// Whatever building the attribute reports.
    pub fn set_attrib(&mut self, name: &str, spec: AttributeSpec) -> Result<(), DefinitionError> {
        let attribute = Attribute::from_spec(name, spec, Arc::clone(&self.catalogs))?;
        self.attribs.insert(name.to_string(), attribute);
        Ok(())
    }

    /// Adds multiple attributes in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first attribute that fails to build.
    pub fn set_attribs(
        &mut self,
        specs: impl IntoIterator<Item = (String, AttributeSpec)>,
    ) -> Result<(), DefinitionError> {
        for (name, spec) in specs {
            self.set_attrib(&name, spec)?;
        }
        Ok(())
    }

    /// Looks up an attribute by its exact path.
    #[must_use]
    pub fn attrib(&self, name: &str) -> Option<&Attribute> {
        self.attribs.get(name)
    }

    /// Mutable attribute lookup, for post-construction tweaks.
    pub fn attrib_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attribs.get_mut(name)
    }

    /// Removes an attribute. Returns whether it existed.
    pub fn remove_attrib(&mut self, name: &str) -> bool {
        self.attribs.shift_remove(name).is_some()
    }

    /// All attributes in declaration order.
    #[must_use]
    pub fn attribs(&self) -> &IndexMap<String, Attribute> {
        &self.attribs
    }

    // ─────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────

    /// The catalogs names are resolved against.
    #[must_use]
    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// The profile-wide error template.
    #[must_use]
    pub fn error_template(&self) -> &str {
        &self.error_template
    }

    /// Replaces the profile-wide error template.
    pub fn set_error_template(&mut self, template: impl Into<String>) {
        self.error_template = template.into();
    }

    /// The profile-wide missing-message template.
    #[must_use]
    pub fn missing_template(&self) -> &str {
        &self.missing_template
    }

    /// Replaces the profile-wide missing-message template.
    pub fn set_missing_template(&mut self, template: impl Into<String>) {
        self.missing_template = template.into();
    }

    /// The separator used to join nested input paths.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Replaces the path separator.
    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// The profile-wide filter chain.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Appends profile-wide filters.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownFilter`] for unresolvable names.
    pub fn add_filters(
        &mut self,
        position: FilterPosition,
        specs: impl IntoIterator<Item = FilterSpec>,
    ) -> Result<(), DefinitionError> {
        let catalogs = Arc::clone(&self.catalogs);
        self.filters.add(position, specs, &catalogs, "profile")
    }

    // ─────────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────────

    /// Evaluates an input record and returns the full bucketed result.
    ///
    /// # Errors
    ///
    /// Only definition errors from lazily resolved rules; validation
    /// failures are reported in the result, not as errors.
    pub fn run(&self, data: &Value) -> Result<CheckResult, DefinitionError> {
        CheckResult::evaluate(self, data)
    }

    /// Evaluates an input record and reports only overall success.
    ///
    /// # Errors
    ///
    /// Same as [`Profile::run`].
    pub fn check(&self, data: &Value) -> Result<bool, DefinitionError> {
        Ok(!self.run(data)?.has_error())
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("attribs", &self.attribs.keys().collect::<Vec<_>>())
            .field("separator", &self.separator)
            .finish()
    }
}
