//! Regex based constraints and fixed-format rules built on them.

use std::sync::Arc;

use formsift_core::util::text_of;
use formsift_core::{Constraint, DefinitionError, RuleCatalog, RuleContext};
use regex::Regex;
use serde_json::Value;

const URL_PART: &str = r"(?i)^(?:[0-9a-z]+[-_~.])*[0-9a-z]+$";
const URL_PART_UNICODE: &str = r"^(?:[0-9\p{L}]+[-_~.])*[0-9\p{L}]+$";
const EMAIL: &str = r"(?i)^[a-z0-9._%+-]+@(?:[a-z0-9-]+\.?)*[a-z0-9]+\.[a-z]{2,4}$";

pub(crate) fn register(catalog: RuleCatalog) -> RuleCatalog {
    catalog
        .rule("Regex", |args| {
            let regex = user_regex(args, "Regex")?;
            Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
                regex.is_match(&text_of(value))
            }) as Constraint)
        })
        .rule("RegexInverse", |args| {
            let regex = user_regex(args, "RegexInverse")?;
            Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
                !regex.is_match(&text_of(value))
            }) as Constraint)
        })
        .rule("Alphanum", |_args| matcher(r"^[0-9a-zA-Z]+$", "Alphanum"))
        .rule("UrlPart", |_args| matcher(URL_PART, "UrlPart"))
        .rule("UrlPartUnicode", |_args| {
            matcher(URL_PART_UNICODE, "UrlPartUnicode")
        })
        .rule("Email", |_args| matcher(EMAIL, "Email"))
}

fn matcher(pattern: &str, name: &str) -> Result<Constraint, DefinitionError> {
    let regex = compile(pattern, name)?;
    Ok(Arc::new(move |value: &Value, _: &RuleContext<'_>| {
        regex.is_match(&text_of(value))
    }))
}

/// Builds the regex of a `Regex:...` constraint. Arguments are
/// re-joined with `:` first, so patterns containing colons survive the
/// constraint-string split. Both plain patterns and `/delimited/` ones
/// with trailing mode letters are accepted; of the PCRE modes only
/// `i`, `m`, `s` and `x` carry over.
fn user_regex(args: &[String], name: &str) -> Result<Regex, DefinitionError> {
    let raw = args.join(":");
    let (pattern, flags) = split_delimited(&raw);
    let pattern = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };
    compile(&pattern, name)
}

fn split_delimited(raw: &str) -> (&str, String) {
    let mut chars = raw.chars();
    if let Some(delim @ ('/' | '#' | '~')) = chars.next() {
        if let Some(end) = raw.rfind(delim) {
            if end > 0 {
                let flags = raw[end + 1..]
                    .chars()
                    .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
                    .collect();
                return (&raw[1..end], flags);
            }
        }
    }
    (raw, String::new())
}

fn compile(pattern: &str, name: &str) -> Result<Regex, DefinitionError> {
    Regex::new(pattern).map_err(|err| DefinitionError::InvalidRegex {
        pattern: pattern.to_string(),
        context: format!("predefined rule `{name}`"),
        reason: err.to_string(),
    })
}
