//! Field validators shared by every route.
//!
//! Pure functions over raw string values: query parameters arrive as strings,
//! and body scalars are validated through their string form (see
//! [`scalar_to_string`]), so one set of predicates covers both. A failing
//! predicate short-circuits the request before any store is touched.

use chrono::{NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

/// Allowed department codes. Membership is checked case-insensitively; the
/// stored value keeps the submitted casing.
pub const DEPARTMENTS: [&str; 8] = ["CSE", "IT", "ME", "CV", "BBA", "BCOM", "EEE", "ECE"];

/// Parse a 24-hex-character record id. The driver's ObjectId parser is the
/// authority on the format.
pub fn parse_record_id(value: &str) -> Option<ObjectId> {
    ObjectId::parse_str(value).ok()
}

pub fn is_known_department(value: &str) -> bool {
    let upper = value.to_uppercase();
    DEPARTMENTS.contains(&upper.as_str())
}

/// Parse an integer strictly greater than zero.
pub fn parse_positive_int(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|n| *n > 0)
}

/// Parse a CGPA in the inclusive range [0.0, 10.0].
pub fn parse_cgpa(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|c| (0.0..=10.0).contains(c))
}

/// Accepted placement date formats: mm-dd-yyyy (the documented format) and
/// ISO yyyy-mm-dd.
pub fn parse_placement_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%m-%d-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

/// True iff `value` parses as a date strictly after `today`.
pub fn is_after(value: &str, today: NaiveDate) -> bool {
    parse_placement_date(value).map(|d| d > today).unwrap_or(false)
}

pub fn is_future_date(value: &str) -> bool {
    is_after(value, Utc::now().date_naive())
}

/// String form of a JSON scalar, matching how the source stringified body
/// fields before validating them (`value + ''`). Arrays and objects have no
/// scalar form and fail validation at the caller.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
