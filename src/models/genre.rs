//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::canonical_url;
use crate::validation::{escape_in_place, rule_error, trim_in_place, FieldError, FormSchema};

pub const NAME_MAX_LEN: usize = 100;

/// Genre record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        canonical_url("genre", &self.id)
    }

    pub fn view(&self) -> GenreView {
        GenreView {
            genre: self.clone(),
            url: self.url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

/// Validated genre ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewGenre {
    pub name: String,
}

/// Create genre form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[serde(default)]
    #[validate(
        length(min = 3, message = "Genre name must contain at least 3 characters"),
        custom(function = "name_max_len")
    )]
    pub name: String,
}

fn name_max_len(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(rule_error(
            "length",
            "Genre name must not exceed 100 characters",
        ));
    }
    Ok(())
}

impl FormSchema for CreateGenre {
    type Record = NewGenre;

    const FIELDS: &'static [&'static str] = &["name"];

    fn trim(&mut self) {
        trim_in_place(&mut self.name);
    }

    fn escape(&mut self) {
        escape_in_place(&mut self.name);
    }

    fn to_record(&self) -> Result<NewGenre, FieldError> {
        Ok(NewGenre {
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn form(name: &str) -> CreateGenre {
        CreateGenre {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_url() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Poetry".to_string(),
        };
        assert_eq!(genre.url(), format!("/catalog/genre/{}", genre.id));
    }

    #[test]
    fn test_short_names_rejected_after_trim() {
        for name in ["", "ab", "  ab  ", "\tx\n"] {
            let rejected = check(form(name)).unwrap_err();
            assert_eq!(
                rejected.errors,
                vec![FieldError::new(
                    "name",
                    "Genre name must contain at least 3 characters"
                )],
                "name {:?}",
                name
            );
        }
    }

    #[test]
    fn test_long_name_rejected() {
        let rejected = check(form(&"x".repeat(101))).unwrap_err();
        assert_eq!(
            rejected.errors,
            vec![FieldError::new(
                "name",
                "Genre name must not exceed 100 characters"
            )]
        );
    }

    #[test]
    fn test_valid_name_is_trimmed_and_escaped() {
        let record = check(form("  Science & Fiction ")).unwrap();
        assert_eq!(record.name, "Science &amp; Fiction");
    }
}
