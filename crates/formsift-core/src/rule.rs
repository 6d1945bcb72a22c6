//! A single named rule attached to an attribute.

use std::sync::OnceLock;

use serde_json::Value;

use crate::attribute::Attribute;
use crate::catalog::{Constraint, RuleContext};
use crate::error::DefinitionError;
use crate::profile::Profile;
use crate::spec::{ConstraintSpec, ErrorSpec, RuleDef, RuleSpec};
use crate::util::{format_template, text_of};

/// Where the rule's predicate lives.
///
/// Lazy rules keep their spec around and resolve it against the
/// catalogs at first check, so a profile can reference a constraint
/// from a catalog that is registered after the rule is declared.
enum ConstraintSlot {
    Ready(Constraint),
    Deferred {
        spec: Option<ConstraintSpec>,
        cell: OnceLock<Constraint>,
    },
}

/// A named predicate with its evaluation flags and error override.
///
/// Rules are immutable once built; checking one never mutates it
/// beyond the one-time resolution of a lazy constraint.
pub struct Rule {
    name: String,
    sufficient: bool,
    skip_empty: bool,
    error: Option<ErrorSpec>,
    slot: ConstraintSlot,
}

impl Rule {
    /// Builds a rule from its spec. Non-lazy named constraints are
    /// resolved immediately so bad definitions surface at build time.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::MissingConstraint`] for a non-lazy rule
    /// without one, or any resolution error from the catalogs.
    pub(crate) fn from_spec(
        name: &str,
        spec: RuleSpec,
        attribute: &str,
        catalogs: &crate::catalog::Catalogs,
    ) -> Result<Self, DefinitionError> {
        let RuleDef {
            constraint,
            sufficient,
            skip_empty,
            lazy,
            error,
        } = spec.into_def();

        let slot = if lazy {
            ConstraintSlot::Deferred {
                spec: constraint,
                cell: OnceLock::new(),
            }
        } else {
            let spec = constraint.ok_or_else(|| DefinitionError::MissingConstraint {
                rule: name.to_string(),
                attribute: attribute.to_string(),
            })?;
            ConstraintSlot::Ready(resolve(&spec, name, attribute, catalogs)?)
        };

        Ok(Self {
            name: name.to_string(),
            sufficient,
            skip_empty,
            error,
            slot,
        })
    }

    /// The rule's name, unique per attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a pass of this rule accepts the attribute outright.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.sufficient
    }

    /// Whether an empty value passes without running the predicate.
    #[must_use]
    pub fn skips_empty(&self) -> bool {
        self.skip_empty
    }

    /// Runs the predicate against a value.
    ///
    /// # Errors
    ///
    /// A lazy rule that fails to resolve its constraint reports the
    /// definition error here instead of at build time.
    pub fn check(
        &self,
        value: &Value,
        attribute: &Attribute,
        profile: &Profile,
    ) -> Result<bool, DefinitionError> {
        if self.skip_empty && text_of(value).is_empty() {
            return Ok(true);
        }
        let constraint = self.constraint(attribute)?;
        let ctx = RuleContext {
            rule: self,
            attribute,
            profile,
        };
        Ok(constraint(value, &ctx))
    }

    fn constraint(&self, attribute: &Attribute) -> Result<Constraint, DefinitionError> {
        match &self.slot {
            ConstraintSlot::Ready(constraint) => Ok(constraint.clone()),
            ConstraintSlot::Deferred { spec, cell } => {
                if let Some(constraint) = cell.get() {
                    return Ok(constraint.clone());
                }
                let spec = spec.as_ref().ok_or_else(|| DefinitionError::MissingConstraint {
                    rule: self.name.clone(),
                    attribute: attribute.name().to_string(),
                })?;
                let constraint = resolve(spec, &self.name, attribute.name(), attribute.catalogs())?;
                // A concurrent resolver may have won; use whichever landed.
                Ok(cell.get_or_init(|| constraint).clone())
            }
        }
    }

    /// Formats the error message for a failure of this rule, resolving
    /// the template through rule, attribute and profile in that order.
    /// Returns `None` when the rule suppresses its error.
    #[must_use]
    pub fn error_text(&self, attribute: &Attribute, profile: &Profile) -> Option<String> {
        let template = match &self.error {
            Some(ErrorSpec::Suppress) => return None,
            Some(ErrorSpec::Template(template)) => template.as_str(),
            None => attribute
                .error_template()
                .unwrap_or_else(|| profile.error_template()),
        };
        Some(format_template(
            template,
            &[("attrib", attribute.name()), ("rule", &self.name)],
        ))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("sufficient", &self.sufficient)
            .field("skip_empty", &self.skip_empty)
            .finish()
    }
}

fn resolve(
    spec: &ConstraintSpec,
    rule: &str,
    attribute: &str,
    catalogs: &crate::catalog::Catalogs,
) -> Result<Constraint, DefinitionError> {
    match spec {
        ConstraintSpec::Named(constraint) => catalogs.resolve_rule(constraint, rule, attribute),
        ConstraintSpec::Callback(constraint) => Ok(constraint.clone()),
    }
}
