//! Date and time constraints.
//!
//! Values are parsed from a small set of common formats rather than a
//! free-form heuristic: ISO dates plus the usual European and US
//! orderings, 24h times with optional seconds, and datetimes as
//! `date time`, `date'T'time` or RFC 3339. `DateTime` accepts a bare
//! date as well.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use formsift_core::util::text_of;
use formsift_core::{Constraint, RuleCatalog, RuleContext};
use serde_json::Value;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parses_date(text: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(text, format).is_ok())
}

fn parses_time(text: &str) -> bool {
    TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(text, format).is_ok())
}

fn parses_datetime(text: &str) -> bool {
    DATETIME_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
        || DateTime::parse_from_rfc3339(text).is_ok()
}

pub(crate) fn register(catalog: RuleCatalog) -> RuleCatalog {
    catalog
        .rule("Date", |_args| {
            Ok(Arc::new(|value: &Value, _: &RuleContext<'_>| {
                parses_date(&text_of(value))
            }) as Constraint)
        })
        .rule("Time", |_args| {
            Ok(Arc::new(|value: &Value, _: &RuleContext<'_>| {
                parses_time(&text_of(value))
            }) as Constraint)
        })
        .rule("DateTime", |_args| {
            Ok(Arc::new(|value: &Value, _: &RuleContext<'_>| {
                let text = text_of(value);
                parses_datetime(&text) || parses_date(&text)
            }) as Constraint)
        })
}
