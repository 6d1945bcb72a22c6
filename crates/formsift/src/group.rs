//! Named collections of profiles with a selectable current one.

use formsift_core::{CheckResult, DefinitionError, Profile, ProfileSpec};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

/// Errors from group-level operations.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum GroupError {
    /// The named profile was never added to the group.
    #[error("profile `{name}` does not exist")]
    #[diagnostic(code(formsift::unknown_profile))]
    UnknownProfile {
        /// The requested profile name.
        name: String,
    },

    /// No profile has been selected yet.
    #[error("no profile selected, cannot run validation")]
    #[diagnostic(code(formsift::no_profile_selected))]
    NoProfileSelected,

    /// Building or running a profile failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Definition(#[from] DefinitionError),
}

/// A set of named profiles sharing one entry point, e.g. one profile
/// per form of an application. One profile is selected at a time and
/// serves all checks until another takes over.
#[derive(Debug, Default)]
pub struct ProfileGroup {
    profiles: IndexMap<String, Profile>,
    current: Option<String>,
}

impl ProfileGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a group from named specs, compiled with the default
    /// catalogs.
    ///
    /// # Errors
    ///
    /// The first spec that fails to build.
    pub fn from_specs(
        specs: impl IntoIterator<Item = (String, ProfileSpec)>,
    ) -> Result<Self, DefinitionError> {
        let mut group = Self::new();
        for (name, spec) in specs {
            group.add_spec(&name, spec)?;
        }
        Ok(group)
    }

    /// Adds or replaces a prebuilt profile.
    pub fn add_profile(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Compiles a spec with the default catalogs and adds it.
    ///
    /// # Errors
    ///
    /// Whatever compiling the spec reports.
    pub fn add_spec(&mut self, name: &str, spec: ProfileSpec) -> Result<(), DefinitionError> {
        self.add_profile(name, crate::compile(spec)?);
        Ok(())
    }

    /// Selects the profile used by subsequent checks.
    ///
    /// # Errors
    ///
    /// [`GroupError::UnknownProfile`] when the name is not in the
    /// group.
    pub fn select(&mut self, name: &str) -> Result<(), GroupError> {
        if !self.profiles.contains_key(name) {
            return Err(GroupError::UnknownProfile {
                name: name.to_string(),
            });
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// The currently selected profile, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Profile> {
        self.current
            .as_deref()
            .and_then(|name| self.profiles.get(name))
    }

    /// Looks a profile up by name.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Runs the selected profile against an input record.
    ///
    /// # Errors
    ///
    /// [`GroupError::NoProfileSelected`] without a selection, or any
    /// error from the run itself.
    pub fn run(&self, data: &Value) -> Result<CheckResult, GroupError> {
        let profile = self.current().ok_or(GroupError::NoProfileSelected)?;
        Ok(profile.run(data)?)
    }

    /// Selects a profile and runs it in one step.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileGroup::select`] and [`ProfileGroup::run`].
    pub fn run_with(&mut self, name: &str, data: &Value) -> Result<CheckResult, GroupError> {
        self.select(name)?;
        self.run(data)
    }

    /// Runs the selected profile and reports only overall success.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileGroup::run`].
    pub fn check(&self, data: &Value) -> Result<bool, GroupError> {
        Ok(!self.run(data)?.has_error())
    }
}
