//! Small shared helpers for value-to-text coercion and message templates.

use std::borrow::Cow;

use serde_json::Value;

/// Coerces a scalar JSON value to its textual form.
///
/// Rules and dependency lookups compare values as text, so the mapping
/// is deliberately simple: strings pass through, `null` becomes the
/// empty string, everything else uses its JSON rendering.
#[must_use]
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        other => Cow::Owned(other.to_string()),
    }
}

/// Returns true when a value coerces to a non-empty text.
#[must_use]
pub fn is_non_empty(value: &Value) -> bool {
    !text_of(value).is_empty()
}

/// Substitutes `:key:` placeholders in an error or missing template.
#[must_use]
pub fn format_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, replacement) in args {
        out = out.replace(&format!(":{key}:"), replacement);
    }
    out
}
