//! Fixed-choice constraints.

use std::sync::Arc;

use formsift_core::util::text_of;
use formsift_core::{Constraint, RuleCatalog, RuleContext};
use serde_json::Value;

pub(crate) fn register(catalog: RuleCatalog) -> RuleCatalog {
    catalog.rule("InArray", |args| {
        let choices: Vec<String> = args.to_vec();
        Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
            let text = text_of(value);
            choices.iter().any(|choice| choice.as_str() == text.as_ref())
        }) as Constraint)
    })
}
