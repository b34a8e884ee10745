//! Structural validation shared by request bodies and model payloads.
//!
//! `validate` never panics on malformed input: type, enum-membership and
//! missing-field problems come back from serde as a single root issue; range
//! and cardinality problems are collected per field by [`Shape`].

use crate::error::{ValidationError, ValidationIssue};
use serde::de::DeserializeOwned;
use std::fmt::Display;

/// A typed shape with structural rules beyond what serde enforces.
pub trait Shape: DeserializeOwned {
    fn collect_issues(&self, issues: &mut Vec<ValidationIssue>);
}

/// Parse and check `raw` against `T`.
pub fn validate<T: Shape>(raw: serde_json::Value) -> Result<T, ValidationError> {
    if !raw.is_object() {
        return Err(vec![ValidationIssue::new("", "expected a JSON object")].into());
    }

    let typed: T = serde_json::from_value(raw)
        .map_err(|e| ValidationError::from(vec![ValidationIssue::new("", e.to_string())]))?;

    let mut issues = Vec::new();
    typed.collect_issues(&mut issues);
    if issues.is_empty() {
        Ok(typed)
    } else {
        Err(issues.into())
    }
}

/// Parse JSON text and validate it. Syntax errors become a root issue.
pub fn validate_str<T: Shape>(raw: &str) -> Result<T, ValidationError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ValidationError::from(vec![ValidationIssue::new("", e.to_string())]))?;
    validate(value)
}

pub(crate) fn check_range<N>(
    issues: &mut Vec<ValidationIssue>,
    path: &str,
    value: N,
    min: N,
    max: N,
) where
    N: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        issues.push(ValidationIssue::new(
            path,
            format!("must be between {min} and {max} (got {value})"),
        ));
    }
}

pub(crate) fn check_len(issues: &mut Vec<ValidationIssue>, path: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        issues.push(ValidationIssue::new(
            path,
            format!("must be at most {max} characters"),
        ));
    }
}

pub(crate) fn check_non_empty(issues: &mut Vec<ValidationIssue>, path: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::new(path, "must not be empty"));
    }
}
