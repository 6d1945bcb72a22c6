//! End-to-end engine scenarios built from callback rules and filters.

use formsift_core::{
    AttributeDef, AttributeSpec, Catalogs, ConstraintSpec, ErrorSpec, FilterSpec, Profile,
    ProfileSpec, RuleCatalog, RuleDef, RuleSpec,
};
use formsift_core::util::text_of;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::sync::Arc;

fn build(spec: ProfileSpec) -> Profile {
    Profile::from_spec(spec, Catalogs::new()).expect("profile should build")
}

#[test]
fn error_template_inheritance() {
    let spec = ProfileSpec {
        error_template: Some("profile says :attrib: failed :rule:".into()),
        attribs: IndexMap::from([
            (
                "fromRule".to_string(),
                AttributeSpec::from(AttributeDef {
                    rules: IndexMap::from([(
                        "reject".to_string(),
                        RuleSpec::Def(RuleDef {
                            constraint: Some(ConstraintSpec::callback(|_, _| false)),
                            error: Some(ErrorSpec::Template("rule says no".into())),
                            ..RuleDef::default()
                        }),
                    )]),
                    ..AttributeDef::default()
                }),
            ),
            (
                "fromAttrib".to_string(),
                AttributeSpec::from(AttributeDef {
                    error: Some("attrib :attrib: rejects :rule:".into()),
                    rules: IndexMap::from([(
                        "reject".to_string(),
                        RuleSpec::callback(|_, _| false),
                    )]),
                    ..AttributeDef::default()
                }),
            ),
            (
                "fromProfile".to_string(),
                AttributeSpec::from(AttributeDef {
                    rules: IndexMap::from([(
                        "reject".to_string(),
                        RuleSpec::callback(|_, _| false),
                    )]),
                    ..AttributeDef::default()
                }),
            ),
        ]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "fromRule": 1, "fromAttrib": 1, "fromProfile": 1 }))
        .expect("run should succeed");

    let errors = result.invalid_errors();
    assert_eq!(errors["fromRule"], Some("rule says no"));
    assert_eq!(errors["fromAttrib"], Some("attrib fromAttrib rejects reject"));
    assert_eq!(
        errors["fromProfile"],
        Some("profile says fromProfile failed reject")
    );
}

#[test]
fn default_templates_render_attribute_and_rule_names() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([
            (
                "attrib1".to_string(),
                AttributeSpec::from(AttributeDef {
                    required: true,
                    ..AttributeDef::default()
                }),
            ),
            (
                "attrib2".to_string(),
                AttributeSpec::from(AttributeDef {
                    rules: IndexMap::from([(
                        "minLength".to_string(),
                        RuleSpec::callback(|v, _| text_of(v).len() >= 5),
                    )]),
                    ..AttributeDef::default()
                }),
            ),
        ]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "attrib2": "abc" }))
        .expect("run should succeed");

    assert_eq!(
        result.error_texts(" - "),
        "Attribute \"attrib2\" does not match \"minLength\" - Attribute \"attrib1\" is missing"
    );
}

#[test]
fn filter_order_is_profile_attribute_rules_attribute_profile() {
    let tag = |label: &'static str| {
        FilterSpec::callback(move |value: Value, _ctx| {
            Value::String(format!("{}{label}", text_of(&value)))
        })
    };
    let spec = ProfileSpec {
        pre_filters: vec![tag("P")],
        post_filters: vec![tag("Q")],
        attribs: IndexMap::from([(
            "field".to_string(),
            AttributeSpec::from(AttributeDef {
                pre_filters: vec![tag("a")],
                post_filters: vec![tag("b")],
                rules: IndexMap::from([(
                    "sawPreOnly".to_string(),
                    // The rule sees profile-pre then attribute-pre.
                    RuleSpec::callback(|v, _| text_of(v).ends_with("Pa")),
                )]),
                ..AttributeDef::default()
            }),
        )]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "field": "x" }))
        .expect("run should succeed");

    assert_eq!(result.valid_data()["field"], &json!("xPabQ"));
}

#[test]
fn no_filters_attribute_sees_raw_value() {
    let spec = ProfileSpec {
        pre_filters: vec![FilterSpec::callback(|_, _| json!("mangled"))],
        attribs: IndexMap::from([(
            "raw".to_string(),
            AttributeSpec::from(AttributeDef {
                no_filters: true,
                rules: IndexMap::from([(
                    "untouched".to_string(),
                    RuleSpec::callback(|v, _| v == &json!("original")),
                )]),
                ..AttributeDef::default()
            }),
        )]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "raw": "original" }))
        .expect("run should succeed");
    assert_eq!(result.valid_data()["raw"], &json!("original"));
}

#[test]
fn skip_empty_rules_pass_empty_values() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([(
            "optional".to_string(),
            AttributeSpec::from(AttributeDef {
                rules: IndexMap::from([(
                    "longEnough".to_string(),
                    RuleSpec::Def(RuleDef {
                        constraint: Some(ConstraintSpec::callback(|v, _| text_of(v).len() >= 3)),
                        skip_empty: true,
                        ..RuleDef::default()
                    }),
                )]),
                ..AttributeDef::default()
            }),
        )]),
        ..ProfileSpec::default()
    };
    let p = build(spec);
    assert!(p.check(&json!({ "optional": "" })).expect("run"));
    assert!(p.check(&json!({ "optional": "abc" })).expect("run"));
    assert!(!p.check(&json!({ "optional": "ab" })).expect("run"));
}

#[test]
fn custom_separator_applies_to_paths_and_wildcards() {
    let spec = ProfileSpec {
        separator: Some("/".into()),
        attribs: IndexMap::from([
            ("user/name".to_string(), AttributeSpec::Required(true)),
            ("meta/*".to_string(), AttributeSpec::callback(|_, _| true)),
        ]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "user": { "name": "x" }, "meta": { "any": 1 } }))
        .expect("run should succeed");
    assert!(result.valid().contains_key("user/name"));
    assert_eq!(result.attribute_for("meta/any"), Some("meta/*"));
}

#[test]
fn regex_dependent_requires_matching_group() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([
            (
                "code".to_string(),
                AttributeSpec::from(AttributeDef {
                    dependent_regex: IndexMap::from([(
                        "/^DE/".to_string(),
                        vec!["vatId".to_string()],
                    )]),
                    ..AttributeDef::default()
                }),
            ),
            ("vatId".to_string(), AttributeSpec::Required(false)),
        ]),
        ..ProfileSpec::default()
    };
    let p = build(spec);
    let result = p.run(&json!({ "code": "DE123" })).expect("run");
    assert!(result.missing().contains_key("vatId"));
    let result = p.run(&json!({ "code": "FR123" })).expect("run");
    assert!(!result.has_error());
}

#[test]
fn lazy_rule_reports_unknown_constraint_at_run_time() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([(
            "field".to_string(),
            AttributeSpec::from(AttributeDef {
                rules: IndexMap::from([(
                    "later".to_string(),
                    RuleSpec::Def(RuleDef {
                        constraint: Some(ConstraintSpec::named("NoSuchConstraint")),
                        lazy: true,
                        ..RuleDef::default()
                    }),
                )]),
                ..AttributeDef::default()
            }),
        )]),
        ..ProfileSpec::default()
    };
    // Building succeeds even though the constraint does not resolve.
    let p = build(spec);
    assert!(p.run(&json!({ "field": "x" })).is_err());
    // Paths that never reach the rule do not trip it.
    assert!(p.run(&json!({})).is_ok());
}

#[test]
fn lazy_rule_resolves_against_profile_catalogs() {
    let catalog = RuleCatalog::new("extra").rule("AlwaysOk", |_args| {
        Ok(Arc::new(|_: &Value, _: &formsift_core::RuleContext<'_>| true))
    });
    let spec = ProfileSpec {
        rule_catalogs: vec![catalog],
        attribs: IndexMap::from([(
            "field".to_string(),
            AttributeSpec::from(AttributeDef {
                rules: IndexMap::from([(
                    "later".to_string(),
                    RuleSpec::Def(RuleDef {
                        constraint: Some(ConstraintSpec::named("AlwaysOk")),
                        lazy: true,
                        ..RuleDef::default()
                    }),
                )]),
                ..AttributeDef::default()
            }),
        )]),
        ..ProfileSpec::default()
    };
    let p = build(spec);
    assert!(p.check(&json!({ "field": "x" })).expect("run"));
}

#[test]
fn rerunning_a_profile_reproduces_the_classification() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([
            (
                "name".to_string(),
                AttributeSpec::callback(|v, _| text_of(v).len() >= 3),
            ),
            ("short".to_string(), AttributeSpec::callback(|_, _| false)),
            (
                "kind".to_string(),
                AttributeSpec::from(AttributeDef {
                    dependent: IndexMap::from([(
                        "card".to_string(),
                        vec!["cardNumber".to_string()],
                    )]),
                    ..AttributeDef::default()
                }),
            ),
            ("cardNumber".to_string(), AttributeSpec::Required(false)),
        ]),
        ..ProfileSpec::default()
    };
    let p = build(spec);
    let input = json!({ "name": "worf", "short": "x", "kind": "card", "stray": 1 });

    let first = p.run(&input).expect("run");
    let second = p.run(&input).expect("run");

    assert_eq!(first.valid_data(), second.valid_data());
    assert_eq!(first.invalid_errors(), second.invalid_errors());
    assert_eq!(first.missing_errors(), second.missing_errors());
    assert_eq!(first.unknown(), second.unknown());
    assert_eq!(first.error_texts(" - "), second.error_texts(" - "));
}

#[test]
fn programmatic_mutation_after_construction() {
    let mut profile = Profile::new(Catalogs::new());
    profile
        .set_attrib("age", AttributeSpec::Required(true))
        .expect("attrib should build");
    let attrib = profile.attrib_mut("age").expect("attrib exists");
    attrib
        .set_rule("number", RuleSpec::callback(|v, _| v.is_number()))
        .expect("rule should build");
    attrib.set_missing(Some("age wanted".into()));

    let result = profile.run(&json!({})).expect("run");
    assert_eq!(result.missing_errors()["age"], "age wanted");
    assert!(profile.check(&json!({ "age": 30 })).expect("run"));
    assert!(!profile.check(&json!({ "age": "old" })).expect("run"));
}

#[test]
fn arrays_flatten_to_indexed_paths() {
    let spec = ProfileSpec {
        attribs: IndexMap::from([(
            "tags.*".to_string(),
            AttributeSpec::callback(|v, _| text_of(v).len() >= 2),
        )]),
        ..ProfileSpec::default()
    };
    let result = build(spec)
        .run(&json!({ "tags": ["ok", "x"] }))
        .expect("run should succeed");
    assert!(result.valid().contains_key("tags.0"));
    assert!(result.invalid().contains_key("tags.1"));
}
