//! A named input attribute with rules, filters and dependencies.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde_json::Value;

use crate::catalog::Catalogs;
use crate::error::DefinitionError;
use crate::filter::{FilterChain, FilterPosition};
use crate::profile::Profile;
use crate::rule::Rule;
use crate::spec::{AttributeDef, AttributeSpec, FilterSpec, RuleSpec};
use crate::util::{format_template, text_of};

/// Name of the anonymous rule created by the single-constraint
/// attribute shorthand.
pub const DEFAULT_RULE: &str = "default";

/// Outcome of checking one attribute against one value.
#[derive(Debug)]
pub enum CheckOutcome<'a> {
    /// All rules accepted the value (or one did, in match-any mode).
    Pass,
    /// The decisive failed rule.
    Fail(&'a Rule),
}

impl CheckOutcome<'_> {
    /// True for [`CheckOutcome::Pass`].
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// A named attribute: the unit a flattened input path is matched
/// against.
///
/// Attributes keep a handle on their profile's catalogs so rules can
/// be added (or lazily resolved) after construction.
pub struct Attribute {
    name: String,
    required: bool,
    match_any: bool,
    no_filters: bool,
    default: Option<Value>,
    missing: Option<String>,
    error: Option<String>,
    rules: IndexMap<String, Rule>,
    dependent: IndexMap<String, Vec<String>>,
    dependent_regex: Vec<(Regex, Vec<String>)>,
    filters: FilterChain,
    catalogs: Arc<Catalogs>,
}

impl Attribute {
    /// Builds an attribute from its spec.
    ///
    /// # Errors
    ///
    /// Any rule, filter or dependent-regex of the definition that
    /// fails to resolve or compile.
    pub(crate) fn from_spec(
        name: &str,
        spec: AttributeSpec,
        catalogs: Arc<Catalogs>,
    ) -> Result<Self, DefinitionError> {
        let def = match spec {
            AttributeSpec::Required(required) => AttributeDef {
                required,
                ..AttributeDef::default()
            },
            AttributeSpec::Constraint(constraint) => AttributeDef {
                rules: IndexMap::from([(
                    DEFAULT_RULE.to_string(),
                    RuleSpec::Constraint(constraint),
                )]),
                ..AttributeDef::default()
            },
            AttributeSpec::Def(def) => *def,
        };

        let mut attribute = Self {
            name: name.to_string(),
            required: def.required,
            match_any: def.match_any,
            no_filters: def.no_filters,
            default: def.default,
            missing: def.missing,
            error: def.error,
            rules: IndexMap::new(),
            dependent: def.dependent,
            dependent_regex: Vec::new(),
            filters: FilterChain::new(),
            catalogs,
        };
        for (pattern, names) in def.dependent_regex {
            attribute.add_dependent_regex(&pattern, names)?;
        }
        attribute.set_rules(def.rules)?;
        attribute.add_filters(FilterPosition::Pre, def.pre_filters)?;
        attribute.add_filters(FilterPosition::Post, def.post_filters)?;
        Ok(attribute)
    }

    // ─────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────

    /// The attribute's name, i.e. the flat path it matches.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the attribute must be present in the input.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether one passing rule is enough to accept a value.
    #[must_use]
    pub fn is_match_any(&self) -> bool {
        self.match_any
    }

    /// Whether profile and attribute filter chains apply to this
    /// attribute's values.
    #[must_use]
    pub fn uses_filters(&self) -> bool {
        !self.no_filters
    }

    /// The substitute value used when the attribute is absent.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The attribute-level error template, if any.
    #[must_use]
    pub fn error_template(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rules in check order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// The attribute's own filter chain.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub(crate) fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Formats the missing-message for this attribute, falling back to
    /// the profile template.
    #[must_use]
    pub fn missing_text(&self, profile: &Profile) -> String {
        let template = self
            .missing
            .as_deref()
            .unwrap_or_else(|| profile.missing_template());
        format_template(template, &[("attrib", &self.name)])
    }

    // ─────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────

    /// Marks the attribute required or optional.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Switches between all-rules and any-rule acceptance.
    pub fn set_match_any(&mut self, match_any: bool) {
        self.match_any = match_any;
    }

    /// Enables or disables filter chains for this attribute.
    pub fn set_no_filters(&mut self, no_filters: bool) {
        self.no_filters = no_filters;
    }

    /// Sets or clears the default value.
    pub fn set_default(&mut self, default: Option<Value>) {
        self.default = default;
    }

    /// Sets or clears the missing-message template.
    pub fn set_missing(&mut self, missing: Option<String>) {
        self.missing = missing;
    }

    /// Sets or clears the attribute-level error template.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Adds or replaces a rule. Replacing keeps the original position
    /// in check order.
    ///
    /// # Errors
    ///
    /// Whatever the rule's constraint resolution reports.
    pub fn set_rule(&mut self, name: &str, spec: RuleSpec) -> Result<(), DefinitionError> {
        let rule = Rule::from_spec(name, spec, &self.name, &self.catalogs)?;
        self.rules.insert(name.to_string(), rule);
        Ok(())
    }

    /// Adds multiple rules in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first rule that fails to build.
    pub fn set_rules(
        &mut self,
        rules: impl IntoIterator<Item = (String, RuleSpec)>,
    ) -> Result<(), DefinitionError> {
        for (name, spec) in rules {
            self.set_rule(&name, spec)?;
        }
        Ok(())
    }

    /// Removes a rule by name. Returns whether it existed.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        self.rules.shift_remove(name).is_some()
    }

    /// Registers a dependency on an exact value (or `"*"` for any
    /// non-empty value without an exact entry).
    pub fn add_dependent(&mut self, on_value: impl Into<String>, requires: Vec<String>) {
        self.dependent.insert(on_value.into(), requires);
    }

    /// Registers a dependency keyed by a regex over the checked value.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::InvalidRegex`] when the pattern does not
    /// compile.
    pub fn add_dependent_regex(
        &mut self,
        pattern: &str,
        requires: Vec<String>,
    ) -> Result<(), DefinitionError> {
        let regex = Regex::new(strip_pattern_delimiters(pattern)).map_err(|err| {
            DefinitionError::InvalidRegex {
                pattern: pattern.to_string(),
                context: format!("dependent regex of attribute `{}`", self.name),
                reason: err.to_string(),
            }
        })?;
        self.dependent_regex.push((regex, requires));
        Ok(())
    }

    /// Appends filters to the attribute's own chain.
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
        self.filters.add(position, specs, &catalogs, &self.name)
    }

    // ─────────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────────

    /// Checks a value against the attribute's rules.
    ///
    /// In the default mode every rule must pass and the first failure
    /// decides; a passing sufficient rule accepts immediately. In
    /// match-any mode one passing rule accepts, and only if all fail
    /// does the first failure decide. An attribute without rules
    /// passes vacuously, in either mode.
    ///
    /// # Errors
    ///
    /// Deferred constraint resolution may fail here.
    pub fn check<'a>(
        &'a self,
        value: &Value,
        profile: &Profile,
    ) -> Result<CheckOutcome<'a>, DefinitionError> {
        let mut first_failed: Option<&Rule> = None;
        for rule in self.rules.values() {
            if rule.check(value, self, profile)? {
                if self.match_any || rule.is_sufficient() {
                    return Ok(CheckOutcome::Pass);
                }
            } else if !self.match_any {
                tracing::debug!(attribute = %self.name, rule = rule.name(), "rule failed");
                return Ok(CheckOutcome::Fail(rule));
            } else if first_failed.is_none() {
                first_failed = Some(rule);
            }
        }
        Ok(match first_failed {
            Some(rule) => {
                tracing::debug!(attribute = %self.name, rule = rule.name(), "no rule matched");
                CheckOutcome::Fail(rule)
            }
            None => CheckOutcome::Pass,
        })
    }

    /// Collects attributes made required by this attribute's accepted
    /// value.
    ///
    /// Exact-value entries win over the `"*"` entry: the wildcard only
    /// fires for a non-empty value no exact entry matched. Regex
    /// entries fire independently of both.
    pub fn collect_dependents(&self, value: &Value, required: &mut IndexSet<String>) {
        let text = text_of(value);

        let mut exact_hit = false;
        for (on_value, names) in &self.dependent {
            if on_value == "*" {
                continue;
            }
            if text.as_ref() == on_value {
                exact_hit = true;
                required.extend(names.iter().cloned());
            }
        }

        if !text.is_empty() && !exact_hit {
            if let Some(names) = self.dependent.get("*") {
                required.extend(names.iter().cloned());
            }
        }

        for (regex, names) in &self.dependent_regex {
            if regex.is_match(&text) {
                required.extend(names.iter().cloned());
            }
        }
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("match_any", &self.match_any)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Accepts both plain patterns and `/delimited/` ones as used in
/// definition files, with trailing mode letters ignored.
pub(crate) fn strip_pattern_delimiters(pattern: &str) -> &str {
    let mut chars = pattern.chars();
    match chars.next() {
        Some(delim @ ('/' | '#' | '~')) => match pattern.rfind(delim) {
            Some(end) if end > 0 => &pattern[1..end],
            _ => pattern,
        },
        _ => pattern,
    }
}
