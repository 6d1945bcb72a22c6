//! Length constraints, counted in characters of the textual form.

use std::sync::Arc;

use formsift_core::util::text_of;
use formsift_core::{Constraint, RuleCatalog, RuleContext};
use serde_json::Value;

use crate::usize_arg;

fn len_of(value: &Value) -> usize {
    text_of(value).chars().count()
}

pub(crate) fn register(catalog: RuleCatalog) -> RuleCatalog {
    catalog
        .rule("LenMin", |args| {
            let min = usize_arg(args, 0, "LenMin")?;
            Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
                len_of(value) >= min
            }) as Constraint)
        })
        .rule("LenMax", |args| {
            let max = usize_arg(args, 0, "LenMax")?;
            Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
                len_of(value) <= max
            }) as Constraint)
        })
        .rule("LenRange", |args| {
            let min = usize_arg(args, 0, "LenRange")?;
            let max = usize_arg(args, 1, "LenRange")?;
            Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
                (min..=max).contains(&len_of(value))
            }) as Constraint)
        })
}

#[cfg(test)]
mod tests {
    use formsift_core::{AttributeSpec, Catalogs, Profile};
    use serde_json::json;

    fn profile(constraint: &str) -> Profile {
        let catalogs = Catalogs::new().with_rule_catalog(crate::basic_rules());
        let mut profile = Profile::new(catalogs);
        profile
            .set_attrib("attrib1", AttributeSpec::named(constraint))
            .expect("attrib should build");
        profile
    }

    #[test]
    fn len_min() {
        let p = profile("LenMin:3");
        assert!(!p.check(&json!({ "attrib1": "f" })).expect("run"));
        assert!(p.check(&json!({ "attrib1": "foo" })).expect("run"));
    }

    #[test]
    fn len_max() {
        let p = profile("LenMax:3");
        assert!(!p.check(&json!({ "attrib1": "fooo" })).expect("run"));
        assert!(p.check(&json!({ "attrib1": "foo" })).expect("run"));
    }

    #[test]
    fn len_range() {
        let p = profile("LenRange:3:4");
        assert!(!p.check(&json!({ "attrib1": "fo" })).expect("run"));
        assert!(!p.check(&json!({ "attrib1": "foooo" })).expect("run"));
        assert!(p.check(&json!({ "attrib1": "foo" })).expect("run"));
        assert!(p.check(&json!({ "attrib1": "fooo" })).expect("run"));
    }

    #[test]
    fn numbers_are_measured_by_their_textual_form() {
        let p = profile("LenMin:3");
        assert!(p.check(&json!({ "attrib1": 1234 })).expect("run"));
        assert!(!p.check(&json!({ "attrib1": 12 })).expect("run"));
    }

    #[test]
    fn bad_arguments_fail_at_build_time() {
        let catalogs = Catalogs::new().with_rule_catalog(crate::basic_rules());
        let mut profile = Profile::new(catalogs);
        assert!(profile
            .set_attrib("attrib1", AttributeSpec::named("LenMin:abc"))
            .is_err());
        assert!(profile
            .set_attrib("attrib1", AttributeSpec::named("LenRange:1"))
            .is_err());
    }
}
