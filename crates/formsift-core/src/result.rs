//! The bucketed outcome of running a profile against an input record.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::attribute::{Attribute, CheckOutcome};
use crate::catalog::FilterContext;
use crate::error::DefinitionError;
use crate::filter::FilterPosition;
use crate::flatten::flatten;
use crate::profile::Profile;

/// An accepted input path.
#[derive(Clone, Debug)]
pub struct ValidEntry {
    /// The value after all post filters.
    pub value: Value,
    /// Name of the attribute that matched the path.
    pub attribute: String,
}

/// A rejected input path.
#[derive(Clone, Debug)]
pub struct InvalidEntry {
    /// The pre-filtered value the rules saw.
    pub value: Value,
    /// Name of the attribute that matched the path.
    pub attribute: String,
    /// Formatted error, `None` when the failed rule suppresses it.
    pub error: Option<String>,
}

/// A required attribute absent from the input.
#[derive(Clone, Debug)]
pub struct MissingEntry {
    /// Name of the missing attribute.
    pub attribute: String,
    /// Formatted missing-message.
    pub error: String,
}

/// Outcome of one profile run, with every input path sorted into one
/// of four buckets: valid, invalid, missing or unknown. Bucket order
/// follows input order (first pass) and declaration order (second
/// pass).
#[derive(Clone, Debug, Default)]
pub struct CheckResult {
    valid: IndexMap<String, ValidEntry>,
    invalid: IndexMap<String, InvalidEntry>,
    missing: IndexMap<String, MissingEntry>,
    unknown: IndexMap<String, Value>,
}

impl CheckResult {
    /// Runs the two-pass evaluation.
    ///
    /// The first pass flattens the input and routes every path to its
    /// attribute, exact name first, then the longest matching
    /// `prefix.*` wildcard. The second pass walks the declared
    /// attributes that saw no input: defaults become valid, required
    /// and dependency-required ones become missing, except wildcards
    /// satisfied by any seen path under their prefix.
    pub(crate) fn evaluate(profile: &Profile, data: &Value) -> Result<Self, DefinitionError> {
        let separator = profile.separator();
        let mut result = Self::default();
        let mut required_dependent: IndexSet<String> = IndexSet::new();
        let mut seen: IndexSet<String> = IndexSet::new();

        let profile_ctx = FilterContext {
            attribute: None,
            profile,
        };

        for (path, value) in flatten(data, separator) {
            let attrib = profile
                .attrib(&path)
                .or_else(|| wildcard_attrib(profile, &path, separator));
            seen.insert(path.clone());

            let Some(attrib) = attrib else {
                let value = profile
                    .filters()
                    .apply(FilterPosition::Pre, value, &profile_ctx);
                result.unknown.insert(path, value);
                continue;
            };

            let attrib_ctx = FilterContext {
                attribute: Some(attrib),
                profile,
            };
            let value = if attrib.uses_filters() {
                let value = profile
                    .filters()
                    .apply(FilterPosition::Pre, value, &profile_ctx);
                attrib.filters().apply(FilterPosition::Pre, value, &attrib_ctx)
            } else {
                value
            };

            match attrib.check(&value, profile)? {
                CheckOutcome::Pass => {
                    attrib.collect_dependents(&value, &mut required_dependent);
                    let value = if attrib.uses_filters() {
                        let value =
                            attrib.filters().apply(FilterPosition::Post, value, &attrib_ctx);
                        profile
                            .filters()
                            .apply(FilterPosition::Post, value, &profile_ctx)
                    } else {
                        value
                    };
                    result.valid.insert(
                        path,
                        ValidEntry {
                            value,
                            attribute: attrib.name().to_string(),
                        },
                    );
                }
                CheckOutcome::Fail(rule) => {
                    result.invalid.insert(
                        path,
                        InvalidEntry {
                            value,
                            attribute: attrib.name().to_string(),
                            error: rule.error_text(attrib, profile),
                        },
                    );
                }
            }
        }

        for (name, attrib) in profile.attribs() {
            if seen.contains(name) {
                continue;
            }
            if let Some(default) = attrib.default_value() {
                result.valid.insert(
                    name.clone(),
                    ValidEntry {
                        value: default.clone(),
                        attribute: name.clone(),
                    },
                );
            } else if attrib.is_required() || required_dependent.contains(name) {
                if wildcard_satisfied(name, separator, &seen) {
                    continue;
                }
                result.missing.insert(
                    name.clone(),
                    MissingEntry {
                        attribute: name.clone(),
                        error: attrib.missing_text(profile),
                    },
                );
            }
        }

        tracing::debug!(
            valid = result.valid.len(),
            invalid = result.invalid.len(),
            missing = result.missing.len(),
            unknown = result.unknown.len(),
            "profile run finished"
        );
        Ok(result)
    }

    // ─────────────────────────────────────────────────────────────────
    // Buckets
    // ─────────────────────────────────────────────────────────────────

    /// Accepted paths with their entries.
    #[must_use]
    pub fn valid(&self) -> &IndexMap<String, ValidEntry> {
        &self.valid
    }

    /// Rejected paths with their entries.
    #[must_use]
    pub fn invalid(&self) -> &IndexMap<String, InvalidEntry> {
        &self.invalid
    }

    /// Missing attributes with their messages.
    #[must_use]
    pub fn missing(&self) -> &IndexMap<String, MissingEntry> {
        &self.missing
    }

    /// Paths no attribute matched, after profile pre filters.
    #[must_use]
    pub fn unknown(&self) -> &IndexMap<String, Value> {
        &self.unknown
    }

    // ─────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────

    /// Accepted values keyed by path.
    #[must_use]
    pub fn valid_data(&self) -> IndexMap<&str, &Value> {
        self.valid
            .iter()
            .map(|(path, entry)| (path.as_str(), &entry.value))
            .collect()
    }

    /// Rejected values keyed by path.
    #[must_use]
    pub fn invalid_data(&self) -> IndexMap<&str, &Value> {
        self.invalid
            .iter()
            .map(|(path, entry)| (path.as_str(), &entry.value))
            .collect()
    }

    /// Errors of rejected paths; `None` marks a suppressed error.
    #[must_use]
    pub fn invalid_errors(&self) -> IndexMap<&str, Option<&str>> {
        self.invalid
            .iter()
            .map(|(path, entry)| (path.as_str(), entry.error.as_deref()))
            .collect()
    }

    /// Missing-messages keyed by attribute name.
    #[must_use]
    pub fn missing_errors(&self) -> IndexMap<&str, &str> {
        self.missing
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.error.as_str()))
            .collect()
    }

    /// Valid, invalid and unknown values in one map, in that bucket
    /// order.
    #[must_use]
    pub fn all_data(&self) -> IndexMap<&str, &Value> {
        let mut all = self.valid_data();
        all.extend(self.invalid_data());
        all.extend(self.unknown.iter().map(|(path, value)| (path.as_str(), value)));
        all
    }

    /// Invalid errors followed by missing-messages, keyed by path.
    #[must_use]
    pub fn all_errors(&self) -> IndexMap<&str, Option<&str>> {
        let mut all = self.invalid_errors();
        all.extend(
            self.missing
                .iter()
                .map(|(name, entry)| (name.as_str(), Some(entry.error.as_str()))),
        );
        all
    }

    /// All non-suppressed error texts, invalid first, joined.
    #[must_use]
    pub fn error_texts(&self, join: &str) -> String {
        self.invalid
            .values()
            .filter_map(|entry| entry.error.as_deref())
            .chain(self.missing.values().map(|entry| entry.error.as_str()))
            .collect::<Vec<_>>()
            .join(join)
    }

    /// Looks a value up across valid, invalid and unknown buckets, in
    /// that order.
    #[must_use]
    pub fn data(&self, path: &str) -> Option<&Value> {
        self.valid
            .get(path)
            .map(|entry| &entry.value)
            .or_else(|| self.invalid.get(path).map(|entry| &entry.value))
            .or_else(|| self.unknown.get(path))
    }

    /// Name of the attribute that handled a path, valid or invalid.
    #[must_use]
    pub fn attribute_for(&self, path: &str) -> Option<&str> {
        self.valid
            .get(path)
            .map(|entry| entry.attribute.as_str())
            .or_else(|| self.invalid.get(path).map(|entry| entry.attribute.as_str()))
    }

    /// Whether anything was rejected or missing.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.invalid.is_empty() || !self.missing.is_empty()
    }

    /// Whether a specific path was rejected or reported missing.
    #[must_use]
    pub fn has_error_for(&self, path: &str) -> bool {
        self.invalid.contains_key(path) || self.missing.contains_key(path)
    }
}

/// Finds the longest `prefix.*` attribute covering a path: for
/// `a.b.c` it tries `a.b.*` before `a.*`.
fn wildcard_attrib<'a>(profile: &'a Profile, path: &str, separator: &str) -> Option<&'a Attribute> {
    let parts: Vec<&str> = path.split(separator).collect();
    if parts.len() < 2 {
        return None;
    }
    for cut in (1..parts.len()).rev() {
        let candidate = format!("{}{separator}*", parts[..cut].join(separator));
        if let Some(attrib) = profile.attrib(&candidate) {
            return Some(attrib);
        }
    }
    None
}

/// A required `prefix.*` attribute counts as present when any seen
/// path sits under its prefix.
fn wildcard_satisfied(name: &str, separator: &str, seen: &IndexSet<String>) -> bool {
    let Some(prefix) = name.strip_suffix(&format!("{separator}*")) else {
        return false;
    };
    if prefix.is_empty() {
        return false;
    }
    let with_separator = format!("{prefix}{separator}");
    seen.iter().any(|path| path.starts_with(&with_separator))
}
