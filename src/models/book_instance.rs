//! Book instance (physical copy) model and related types

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{book::BookTitleView, canonical_url, format_medium_date, BookTitle};
use crate::validation::{
    escape_in_place, parse_iso_date, parse_reference, rule_error, trim_in_place, FieldError,
    FormSchema,
};

/// Availability of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown book instance status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for BookInstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Book instance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        canonical_url("bookinstance", &self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        format_medium_date(self.due_back.date_naive())
    }

    pub fn view(&self) -> BookInstanceView {
        BookInstanceView {
            instance: self.clone(),
            url: self.url(),
            due_back_formatted: self.due_back_formatted(),
            book: None,
        }
    }
}

/// Book instance with its book resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceWithBook {
    pub instance: BookInstance,
    pub book: BookTitle,
}

impl BookInstanceWithBook {
    pub fn view(&self) -> BookInstanceView {
        BookInstanceView {
            book: Some(self.book.view()),
            ..self.instance.view()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookTitleView>,
}

/// Validated book instance ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookInstance {
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

/// Create book instance form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    /// Id of the book this is a copy of
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Please select a book."),
        custom(function = "book_reference")
    )]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must not be empty."))]
    pub imprint: String,
    /// Due back date, ISO-8601
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Date must not be empty."),
        custom(function = "due_back_rule")
    )]
    pub date: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Status must not be empty."),
        custom(function = "status_rule")
    )]
    pub status: String,
}

fn book_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_reference(value).is_some() {
        return Ok(());
    }
    Err(rule_error("reference", "Please select a book."))
}

fn due_back_rule(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_iso_date(value).is_some() {
        return Ok(());
    }
    Err(rule_error("date", "Invalid due back date"))
}

fn status_rule(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<BookInstanceStatus>().is_ok() {
        return Ok(());
    }
    Err(rule_error("status", "Invalid status"))
}

impl FormSchema for CreateBookInstance {
    type Record = NewBookInstance;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "date", "status"];

    fn trim(&mut self) {
        trim_in_place(&mut self.book);
        trim_in_place(&mut self.imprint);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.status);
    }

    fn escape(&mut self) {
        escape_in_place(&mut self.book);
        escape_in_place(&mut self.imprint);
        escape_in_place(&mut self.date);
        escape_in_place(&mut self.status);
    }

    fn to_record(&self) -> Result<NewBookInstance, FieldError> {
        let book_id = parse_reference(&self.book)
            .ok_or_else(|| FieldError::new("book", "Please select a book."))?;
        let due_back = parse_iso_date(&self.date)
            .ok_or_else(|| FieldError::new("date", "Invalid due back date"))?
            .and_time(NaiveTime::MIN)
            .and_utc();
        let status = self
            .status
            .parse()
            .map_err(|_| FieldError::new("status", "Invalid status"))?;
        Ok(NewBookInstance {
            book_id,
            imprint: self.imprint.clone(),
            status,
            due_back,
        })
    }
}
