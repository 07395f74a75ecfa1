//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{canonical_url, format_medium_date};
use crate::validation::{
    escape_in_place, parse_optional_date, rule_error, trim_in_place, FieldError, FormSchema,
};

pub const NAME_MAX_LEN: usize = 100;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "family, first", or an empty string when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Birth and death dates joined by " - "; a missing date leaves its side blank
    pub fn lifespan(&self) -> String {
        let side = |date: Option<NaiveDate>| date.map(format_medium_date).unwrap_or_default();
        format!("{} - {}", side(self.date_of_birth), side(self.date_of_death))
    }

    pub fn url(&self) -> String {
        canonical_url("author", &self.id)
    }

    pub fn view(&self) -> AuthorView {
        AuthorView {
            author: self.clone(),
            name: self.name(),
            lifespan: self.lifespan(),
            url: self.url(),
        }
    }
}

/// Author with derived fields, as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub url: String,
}

/// Validated author ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Create author form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name must be specified"),
        custom(function = "first_name_rules")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Family name must be specified"),
        custom(function = "family_name_rules")
    )]
    pub family_name: String,
    /// ISO-8601 date, may be empty
    #[serde(default)]
    #[validate(custom(function = "date_of_birth_rule"))]
    pub date_of_birth: String,
    /// ISO-8601 date, may be empty
    #[serde(default)]
    #[validate(custom(function = "date_of_death_rule"))]
    pub date_of_death: String,
}

fn first_name_rules(value: &str) -> Result<(), ValidationError> {
    name_rules(
        value,
        "First name must not exceed 100 characters",
        "First name has non-alphanumeric characters",
    )
}

fn family_name_rules(value: &str) -> Result<(), ValidationError> {
    name_rules(
        value,
        "Family name must not exceed 100 characters",
        "Family name has non-alphanumeric characters",
    )
}

fn name_rules(
    value: &str,
    too_long: &'static str,
    not_alphanumeric: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(rule_error("length", too_long));
    }
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(rule_error("alphanumeric", not_alphanumeric));
    }
    Ok(())
}

fn date_of_birth_rule(value: &str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| rule_error("date", "Invalid date of birth"))
}

fn date_of_death_rule(value: &str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| rule_error("date", "Invalid date of death"))
}

impl FormSchema for CreateAuthor {
    type Record = NewAuthor;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn trim(&mut self) {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.family_name);
        trim_in_place(&mut self.date_of_birth);
        trim_in_place(&mut self.date_of_death);
    }

    fn escape(&mut self) {
        escape_in_place(&mut self.first_name);
        escape_in_place(&mut self.family_name);
        escape_in_place(&mut self.date_of_birth);
        escape_in_place(&mut self.date_of_death);
    }

    fn to_record(&self) -> Result<NewAuthor, FieldError> {
        let date_of_birth = parse_optional_date(&self.date_of_birth)
            .map_err(|_| FieldError::new("date_of_birth", "Invalid date of birth"))?;
        let date_of_death = parse_optional_date(&self.date_of_death)
            .map_err(|_| FieldError::new("date_of_death", "Invalid date of death"))?;
        Ok(NewAuthor {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}
