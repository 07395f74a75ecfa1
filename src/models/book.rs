//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{author::AuthorView, canonical_url, genre::GenreView, Author, Genre};
use crate::validation::{
    escape_in_place, parse_reference, rule_error, trim_in_place, FieldError, FormSchema,
};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    /// Genres in the order they were selected
    pub genre_ids: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        canonical_url("book", &self.id)
    }

    pub fn view(&self) -> BookView {
        BookView {
            book: self.clone(),
            url: self.url(),
            author: None,
            genres: Vec::new(),
        }
    }
}

/// Id and title only, used for selection lists and joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookTitle {
    pub id: Uuid,
    pub title: String,
}

impl BookTitle {
    pub fn url(&self) -> String {
        canonical_url("book", &self.id)
    }

    pub fn view(&self) -> BookTitleView {
        BookTitleView {
            book: self.clone(),
            url: self.url(),
        }
    }
}

impl From<&Book> for BookTitle {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookTitleView {
    #[serde(flatten)]
    pub book: BookTitle,
    pub url: String,
}

/// Book with its author resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author: Author,
}

impl BookWithAuthor {
    pub fn view(&self) -> BookView {
        BookView {
            author: Some(self.author.view()),
            ..self.book.view()
        }
    }
}

/// Book with author and genres resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
}

impl BookDetail {
    pub fn view(&self) -> BookView {
        BookView {
            author: Some(self.author.view()),
            genres: self.genres.iter().map(Genre::view).collect(),
            ..self.book.view()
        }
    }
}

/// Book with derived fields and whatever references were resolved
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorView>,
    pub genres: Vec<GenreView>,
}

/// Validated book ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub genre_ids: Vec<Uuid>,
}

/// Create book form; `genre` is repeated once per checked genre
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "author_reference")
    )]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    #[serde(default)]
    #[validate(custom(function = "genre_references"))]
    pub genre: Vec<String>,
}

fn author_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_reference(value).is_some() {
        return Ok(());
    }
    Err(rule_error("reference", "Invalid author selection"))
}

fn genre_references(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| parse_reference(v).is_some()) {
        return Ok(());
    }
    Err(rule_error("reference", "Invalid genre selection"))
}

impl FormSchema for CreateBook {
    type Record = NewBook;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn trim(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.summary);
        trim_in_place(&mut self.isbn);
        self.genre.iter_mut().for_each(trim_in_place);
    }

    fn escape(&mut self) {
        escape_in_place(&mut self.title);
        escape_in_place(&mut self.author);
        escape_in_place(&mut self.summary);
        escape_in_place(&mut self.isbn);
        self.genre.iter_mut().for_each(escape_in_place);
    }

    fn to_record(&self) -> Result<NewBook, FieldError> {
        let author_id = parse_reference(&self.author)
            .ok_or_else(|| FieldError::new("author", "Invalid author selection"))?;
        let mut genre_ids: Vec<Uuid> = Vec::with_capacity(self.genre.len());
        for value in &self.genre {
            let id = parse_reference(value)
                .ok_or_else(|| FieldError::new("genre", "Invalid genre selection"))?;
            if !genre_ids.contains(&id) {
                genre_ids.push(id);
            }
        }
        Ok(NewBook {
            title: self.title.clone(),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            author_id,
            genre_ids,
        })
    }
}

impl CreateBook {
    /// Whether a genre was ticked on the submitted form
    pub fn has_genre(&self, id: &Uuid) -> bool {
        let id = id.to_string();
        self.genre.iter().any(|g| *g == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn form(author: &str, genres: &[&str]) -> CreateBook {
        CreateBook {
            title: "The Name of the Wind".to_string(),
            author: author.to_string(),
            summary: "A hero's tale".to_string(),
            isbn: "9781473211896".to_string(),
            genre: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_form_keeps_genre_order() {
        let author = Uuid::new_v4();
        let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
        let record = check(form(
            &author.to_string(),
            &[&g2.to_string(), &g1.to_string()],
        ))
        .unwrap();
        assert_eq!(record.author_id, author);
        assert_eq!(record.genre_ids, vec![g2, g1]);
        assert_eq!(record.summary, "A hero&#x27;s tale");
    }

    #[test]
    fn test_missing_fields() {
        let rejected = check(CreateBook::default()).unwrap_err();
        assert_eq!(
            rejected.errors,
            vec![
                FieldError::new("title", "Title must not be empty."),
                FieldError::new("author", "Author must not be empty."),
                FieldError::new("summary", "Summary must not be empty."),
                FieldError::new("isbn", "ISBN must not be empty."),
            ]
        );
    }

    #[test]
    fn test_malformed_references() {
        let rejected = check(form("nobody", &["fiction"])).unwrap_err();
        assert_eq!(
            rejected.errors,
            vec![
                FieldError::new("author", "Invalid author selection"),
                FieldError::new("genre", "Invalid genre selection"),
            ]
        );
    }

    #[test]
    fn test_has_genre() {
        let g = Uuid::new_v4();
        let f = form("x", &[&g.to_string()]);
        assert!(f.has_genre(&g));
        assert!(!f.has_genre(&Uuid::new_v4()));
    }

    #[test]
    fn test_detail_view() {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Patrick".to_string(),
            family_name: "Rothfuss".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".to_string(),
        };
        let book = Book {
            id: Uuid::new_v4(),
            title: "The Wise Man's Fear".to_string(),
            summary: "Day two".to_string(),
            isbn: "9780756404734".to_string(),
            author_id: author.id,
            genre_ids: vec![genre.id],
        };
        let detail = BookDetail {
            book: book.clone(),
            author,
            genres: vec![genre.clone()],
        };
        let value = serde_json::to_value(detail.view()).unwrap();
        assert_eq!(value["url"], format!("/catalog/book/{}", book.id));
        assert_eq!(value["author"]["name"], "Rothfuss, Patrick");
        assert_eq!(value["genres"][0]["url"], genre.url());

        let bare = serde_json::to_value(book.view()).unwrap();
        assert!(bare.get("author").is_none());
    }
}
