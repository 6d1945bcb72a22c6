//! Numeric constraints.

use std::sync::Arc;

use formsift_core::util::text_of;
use formsift_core::{Constraint, RuleCatalog, RuleContext};
use serde_json::Value;

fn is_number(value: &Value) -> bool {
    if value.is_number() {
        return true;
    }
    let text = text_of(value);
    text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn is_int(value: &Value) -> bool {
    let text = text_of(value);
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn register(catalog: RuleCatalog) -> RuleCatalog {
    catalog
        .rule("Number", |_args| {
            Ok(Arc::new(|value: &Value, _: &RuleContext<'_>| is_number(value)) as Constraint)
        })
        .rule("Int", |_args| {
            Ok(Arc::new(|value: &Value, _: &RuleContext<'_>| is_int(value)) as Constraint)
        })
}
