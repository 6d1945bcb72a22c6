//! The standard filter transforms.

use std::sync::Arc;

use formsift_core::util::text_of;
use formsift_core::{FilterCatalog, FilterContext, Transform};
use serde_json::Value;

/// Lowercases, replaces every character outside the URL-safe set with
/// `-`, collapses runs of `-` and strips them from both ends.
fn web_compliant(input: &str, unicode: bool) -> String {
    let lowered = input.to_lowercase();
    let keep = |c: char| {
        if unicode {
            c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')
        } else {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '~')
        }
    };
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        let c = if keep(c) { c } else { '-' };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

pub(crate) fn register(catalog: FilterCatalog) -> FilterCatalog {
    catalog
        .filter("Trim", || {
            Arc::new(|value: Value, _: &FilterContext<'_>| match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other,
            }) as Transform
        })
        .filter("WebCompliant", || {
            Arc::new(|value: Value, _: &FilterContext<'_>| {
                Value::String(web_compliant(&text_of(&value), false))
            }) as Transform
        })
        .filter("WebCompliantUnicode", || {
            Arc::new(|value: Value, _: &FilterContext<'_>| {
                Value::String(web_compliant(&text_of(&value), true))
            }) as Transform
        })
}

#[cfg(test)]
mod tests {
    use super::web_compliant;
    use formsift_core::spec::{AttributeDef, FilterSpec};
    use formsift_core::{AttributeSpec, Catalogs, Profile};
    use indexmap::IndexMap;
    use serde_json::json;

    fn profile_with_filter(filter: &str) -> Profile {
        let catalogs = Catalogs::new().with_filter_catalog(crate::basic_filters());
        let mut profile = Profile::new(catalogs);
        profile
            .set_attrib(
                "attrib1",
                AttributeSpec::from(AttributeDef {
                    pre_filters: vec![FilterSpec::named(filter)],
                    rules: IndexMap::new(),
                    ..AttributeDef::default()
                }),
            )
            .expect("attrib should build");
        profile
    }

    #[test]
    fn trim_strips_surrounding_whitespace() {
        let p = profile_with_filter("Trim");
        let result = p.run(&json!({ "attrib1": "  foo \t" })).expect("run");
        assert_eq!(result.valid_data()["attrib1"], &json!("foo"));
    }

    #[test]
    fn trim_leaves_non_strings_alone() {
        let p = profile_with_filter("Trim");
        let result = p.run(&json!({ "attrib1": 42 })).expect("run");
        assert_eq!(result.valid_data()["attrib1"], &json!(42));
    }

    #[test]
    fn web_compliant_ascii() {
        assert_eq!(web_compliant("Hello World!", false), "hello-world");
        assert_eq!(web_compliant("--a--b--", false), "a-b");
        assert_eq!(web_compliant("Ärger", false), "rger");
        assert_eq!(web_compliant("keep_this.~ok", false), "keep_this.~ok");
    }

    #[test]
    fn web_compliant_unicode_keeps_letters() {
        assert_eq!(web_compliant("Ärger im Büro", true), "ärger-im-büro");
        assert_eq!(web_compliant("Hello World!", true), "hello-world");
    }

    #[test]
    fn web_compliant_filter_applies() {
        let p = profile_with_filter("WebCompliant");
        let result = p.run(&json!({ "attrib1": "My Fancy Title" })).expect("run");
        assert_eq!(result.valid_data()["attrib1"], &json!("my-fancy-title"));
    }
}
