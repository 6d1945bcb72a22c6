//! Error types raised while building or evaluating a profile.

use miette::Diagnostic;
use thiserror::Error;

use crate::filter::FilterPosition;

/// Errors produced when a profile definition cannot be turned into a
/// runnable evaluation tree, or when a lazily resolved piece of one
/// fails at first use.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum DefinitionError {
    /// A named constraint was not found in any registered rule catalog.
    #[error("unknown rule constraint `{name}` (from `{constraint}`) for rule `{rule}` on attribute `{attribute}`")]
    #[diagnostic(
        code(formsift::unknown_rule),
        help("register a rule catalog that provides `{name}`, or fix the constraint spelling")
    )]
    UnknownRule {
        /// Constraint name as looked up in the catalogs.
        name: String,
        /// Full constraint string including arguments.
        constraint: String,
        /// Rule that referenced the constraint.
        rule: String,
        /// Attribute owning the rule.
        attribute: String,
    },

    /// A named filter was not found in any registered filter catalog.
    #[error("unknown {position} filter `{filter}` for {owner}")]
    #[diagnostic(
        code(formsift::unknown_filter),
        help("register a filter catalog that provides `{filter}`, or fix the filter spelling")
    )]
    UnknownFilter {
        /// Filter name as looked up in the catalogs.
        filter: String,
        /// Where the filter was attached ("profile" or an attribute name).
        owner: String,
        /// Whether the filter runs before or after rule checks.
        position: FilterPosition,
    },

    /// A rule definition carried neither a constraint string nor a callback.
    #[error("rule `{rule}` on attribute `{attribute}` defines no constraint")]
    #[diagnostic(code(formsift::missing_constraint))]
    MissingConstraint {
        /// Rule missing its constraint.
        rule: String,
        /// Attribute owning the rule.
        attribute: String,
    },

    /// Arguments of a constraint string could not be interpreted by the
    /// rule factory, e.g. `LenMin:abc`.
    #[error("invalid arguments for constraint `{constraint}`: {reason}")]
    #[diagnostic(code(formsift::invalid_rule_args))]
    InvalidRuleArgs {
        /// Full constraint string including arguments.
        constraint: String,
        /// What the factory rejected.
        reason: String,
    },

    /// A regular expression failed to compile.
    #[error("invalid pattern `{pattern}` in {context}: {reason}")]
    #[diagnostic(code(formsift::invalid_regex))]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Where the pattern came from, e.g. a dependent key or a rule.
        context: String,
        /// Compiler message.
        reason: String,
    },
}
