//! Form validation pipeline.
//!
//! Every create form goes through the same steps: trim each field, run the
//! `validator` rules declared on the form struct, escape HTML-significant
//! characters, then convert the sanitized form into a record ready to insert.
//! All rules are evaluated so that every error is reported at once.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single failed rule, as shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// A form that can be run through the pipeline.
pub trait FormSchema: Validate + Sized {
    /// Sanitized, typed record produced from a valid form.
    type Record;

    /// Field names in declaration order; errors are reported in this order.
    const FIELDS: &'static [&'static str];

    fn trim(&mut self);

    fn escape(&mut self);

    fn to_record(&self) -> Result<Self::Record, FieldError>;
}

/// A form that failed validation, kept so the page can show the user's input.
#[derive(Debug)]
pub struct Rejected<F> {
    pub form: F,
    pub errors: Vec<FieldError>,
}

/// Run a submitted form through trim, rules, escape and conversion.
pub fn check<F: FormSchema>(mut form: F) -> Result<F::Record, Rejected<F>> {
    form.trim();
    let outcome = form.validate();
    form.escape();

    if let Err(errors) = outcome {
        let errors = ordered_errors(F::FIELDS, &errors);
        return Err(Rejected { form, errors });
    }

    match form.to_record() {
        Ok(record) => Ok(record),
        Err(error) => Err(Rejected {
            form,
            errors: vec![error],
        }),
    }
}

fn ordered_errors(fields: &[&str], errors: &ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| by_field.get(*field).map(|errs| (*field, errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect()
}

pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Escape `& < > " ' /` so the value can be written into HTML as is.
pub(crate) fn escape_in_place(value: &mut String) {
    *value = html_escape::encode_safe(value.as_str()).into_owned();
}

/// Parse an ISO-8601 calendar date, also accepting a full timestamp.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Empty input means "no date"; anything else must parse.
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, ()> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_iso_date(value).map(Some).ok_or(())
}

pub fn parse_reference(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

pub(crate) fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
