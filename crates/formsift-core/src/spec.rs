//! Declarative profile definitions.
//!
//! These types mirror the JSON/TOML shape of a profile and double as
//! the programmatic construction API. Shorthand forms are accepted
//! where the long form would be noise: an attribute can be just a
//! required flag or a single constraint string, a rule can be just its
//! constraint.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{Constraint, FilterCatalog, RuleCatalog, RuleContext, Transform};
use crate::catalog::FilterContext;

// ─────────────────────────────────────────────────────────────────────
// Constraint / filter specs
// ─────────────────────────────────────────────────────────────────────

/// How a rule's predicate is specified: by catalog name (with optional
/// `:`-separated arguments) or as an inline callback.
#[derive(Clone)]
pub enum ConstraintSpec {
    /// A constraint string resolved against the rule catalogs.
    Named(String),
    /// A ready-made predicate.
    Callback(Constraint),
}

impl ConstraintSpec {
    /// Shorthand for [`ConstraintSpec::Named`].
    pub fn named(constraint: impl Into<String>) -> Self {
        Self::Named(constraint.into())
    }

    /// Wraps a closure as an inline constraint.
    pub fn callback<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(predicate))
    }
}

impl fmt::Debug for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for ConstraintSpec {
    fn from(constraint: &str) -> Self {
        Self::named(constraint)
    }
}

impl<'de> Deserialize<'de> for ConstraintSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::Named(String::deserialize(deserializer)?))
    }
}

/// How a filter is specified: by catalog name or as an inline callback.
#[derive(Clone)]
pub enum FilterSpec {
    /// A filter name resolved against the filter catalogs.
    Named(String),
    /// A ready-made transform.
    Callback(Transform),
}

impl FilterSpec {
    /// Shorthand for [`FilterSpec::Named`].
    pub fn named(filter: impl Into<String>) -> Self {
        Self::Named(filter.into())
    }

    /// Wraps a closure as an inline filter.
    pub fn callback<F>(transform: F) -> Self
    where
        F: Fn(Value, &FilterContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(transform))
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for FilterSpec {
    fn from(filter: &str) -> Self {
        Self::named(filter)
    }
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::Named(String::deserialize(deserializer)?))
    }
}

/// A rule-level error override: a template of its own, or outright
/// suppression (`false` in a definition file).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorSpec {
    /// The failure produces no error message at all.
    Suppress,
    /// Template used instead of the attribute or profile one.
    Template(String),
}

impl From<&str> for ErrorSpec {
    fn from(template: &str) -> Self {
        Self::Template(template.to_string())
    }
}

impl<'de> Deserialize<'de> for ErrorSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(false) => Ok(Self::Suppress),
            Value::String(template) => Ok(Self::Template(template)),
            other => Err(de::Error::custom(format!(
                "expected an error template string or `false`, got {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Rule specs
// ─────────────────────────────────────────────────────────────────────

/// A rule definition: either the bare constraint, or the long form.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Shorthand: the constraint alone, everything else defaulted.
    Constraint(ConstraintSpec),
    /// Long form with flags and error override.
    Def(RuleDef),
}

impl RuleSpec {
    /// Shorthand for a named constraint rule.
    pub fn named(constraint: impl Into<String>) -> Self {
        Self::Constraint(ConstraintSpec::named(constraint))
    }

    /// Shorthand for an inline callback rule.
    pub fn callback<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Constraint(ConstraintSpec::callback(predicate))
    }

    pub(crate) fn into_def(self) -> RuleDef {
        match self {
            Self::Constraint(constraint) => RuleDef {
                constraint: Some(constraint),
                ..RuleDef::default()
            },
            Self::Def(def) => def,
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(constraint: &str) -> Self {
        Self::named(constraint)
    }
}

/// Long-form rule definition.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDef {
    /// The predicate. Required unless the rule is lazy and gets one
    /// before its first check.
    pub constraint: Option<ConstraintSpec>,
    /// A passing sufficient rule accepts the attribute immediately.
    pub sufficient: bool,
    /// An empty value passes this rule without running the predicate.
    pub skip_empty: bool,
    /// Defer constraint resolution until the first check.
    pub lazy: bool,
    /// Error override for this rule.
    pub error: Option<ErrorSpec>,
}

// ─────────────────────────────────────────────────────────────────────
// Attribute specs
// ─────────────────────────────────────────────────────────────────────

/// An attribute definition, from shortest to longest form: a required
/// flag, a single constraint, or the full definition.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    /// Shorthand: `true` marks the attribute required, `false` optional,
    /// no rules either way.
    Required(bool),
    /// Shorthand: one anonymous rule built from this constraint.
    Constraint(ConstraintSpec),
    /// Long form.
    Def(Box<AttributeDef>),
}

impl AttributeSpec {
    /// Shorthand for a single named-constraint rule.
    pub fn named(constraint: impl Into<String>) -> Self {
        Self::Constraint(ConstraintSpec::named(constraint))
    }

    /// Shorthand for a single inline callback rule.
    pub fn callback<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Constraint(ConstraintSpec::callback(predicate))
    }
}

impl From<bool> for AttributeSpec {
    fn from(required: bool) -> Self {
        Self::Required(required)
    }
}

impl From<&str> for AttributeSpec {
    fn from(constraint: &str) -> Self {
        Self::named(constraint)
    }
}

impl From<AttributeDef> for AttributeSpec {
    fn from(def: AttributeDef) -> Self {
        Self::Def(Box::new(def))
    }
}

/// Long-form attribute definition.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeDef {
    /// The attribute must be present in the input.
    pub required: bool,
    /// Accept when any rule passes, instead of requiring all.
    pub match_any: bool,
    /// Skip profile and attribute filter chains for this attribute.
    pub no_filters: bool,
    /// Substitute when the attribute is absent from the input.
    pub default: Option<Value>,
    /// Missing-message template override.
    pub missing: Option<String>,
    /// Error template for failed rules without one of their own.
    pub error: Option<String>,
    /// Rules, checked in insertion order.
    pub rules: IndexMap<String, RuleSpec>,
    /// Dependency map: when this attribute passes with a given textual
    /// value, the listed attributes become required. The key `"*"`
    /// fires for any non-empty value without an exact entry.
    pub dependent: IndexMap<String, Vec<String>>,
    /// Like `dependent`, keyed by regex matched against the value.
    pub dependent_regex: IndexMap<String, Vec<String>>,
    /// Filters applied before rules run.
    pub pre_filters: Vec<FilterSpec>,
    /// Filters applied to accepted values.
    pub post_filters: Vec<FilterSpec>,
}

// ─────────────────────────────────────────────────────────────────────
// Profile spec
// ─────────────────────────────────────────────────────────────────────

/// A whole profile definition.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSpec {
    /// Attributes, keyed by flat path (exact or `prefix.*` wildcard).
    #[serde(alias = "attributes")]
    pub attribs: IndexMap<String, AttributeSpec>,
    /// Error template for rules and attributes without their own.
    pub error_template: Option<String>,
    /// Missing-message template for attributes without their own.
    pub missing_template: Option<String>,
    /// Path separator used when flattening input, default `.`.
    pub separator: Option<String>,
    /// Profile-wide filters applied before rules run. Unknown paths
    /// get these too.
    pub pre_filters: Vec<FilterSpec>,
    /// Profile-wide filters applied to accepted values.
    pub post_filters: Vec<FilterSpec>,
    /// Extra rule catalogs, consulted after any base ones.
    #[serde(skip)]
    pub rule_catalogs: Vec<RuleCatalog>,
    /// Extra filter catalogs, consulted after any base ones.
    #[serde(skip)]
    pub filter_catalogs: Vec<FilterCatalog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_shorthand_forms_deserialize() {
        let spec: ProfileSpec = serde_json::from_value(json!({
            "attribs": {
                "flag": true,
                "loose": false,
                "named": "LenMin:3",
                "full": { "required": true, "rules": { "len": "LenMin:3" } },
            }
        }))
        .map_err(|e| e.to_string())
        .unwrap();

        assert!(matches!(spec.attribs["flag"], AttributeSpec::Required(true)));
        assert!(matches!(spec.attribs["loose"], AttributeSpec::Required(false)));
        assert!(matches!(
            spec.attribs["named"],
            AttributeSpec::Constraint(ConstraintSpec::Named(_))
        ));
        match &spec.attribs["full"] {
            AttributeSpec::Def(def) => {
                assert!(def.required);
                assert_eq!(def.rules.len(), 1);
            }
            other => panic!("expected long form, got {other:?}"),
        }
    }

    #[test]
    fn rule_def_flags_deserialize() {
        let spec: RuleSpec = serde_json::from_value(json!({
            "constraint": "Number",
            "sufficient": true,
            "skipEmpty": true,
            "error": false,
        }))
        .map_err(|e| e.to_string())
        .unwrap();
        let def = spec.into_def();
        assert!(def.sufficient);
        assert!(def.skip_empty);
        assert_eq!(def.error, Some(ErrorSpec::Suppress));
    }

    #[test]
    fn error_spec_rejects_true() {
        assert!(serde_json::from_value::<ErrorSpec>(json!(true)).is_err());
        assert_eq!(
            serde_json::from_value::<ErrorSpec>(json!("oops"))
                .map_err(|e| e.to_string())
                .unwrap(),
            ErrorSpec::Template("oops".into())
        );
    }

    #[test]
    fn attributes_alias_is_accepted() {
        let spec: ProfileSpec = serde_json::from_value(json!({
            "attributes": { "name": true }
        }))
        .map_err(|e| e.to_string())
        .unwrap();
        assert_eq!(spec.attribs.len(), 1);
    }

    #[test]
    fn profile_spec_from_toml() {
        let spec: ProfileSpec = toml::from_str(
            r#"
            errorTemplate = "bad :attrib:"

            [attribs.name]
            required = true

            [attribs.name.rules]
            len = "LenMin:2"
            "#,
        )
        .map_err(|e| e.to_string())
        .unwrap();
        assert_eq!(spec.error_template.as_deref(), Some("bad :attrib:"));
        assert!(spec.attribs.contains_key("name"));
    }
}
