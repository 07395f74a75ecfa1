//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;
use uuid::Uuid;

// Re-export commonly used types
pub use author::{Author, AuthorView, CreateAuthor, NewAuthor};
pub use book::{Book, BookDetail, BookTitle, BookView, BookWithAuthor, CreateBook, NewBook};
pub use book_instance::{
    BookInstance, BookInstanceStatus, BookInstanceView, BookInstanceWithBook, CreateBookInstance,
    NewBookInstance,
};
pub use genre::{CreateGenre, Genre, GenreView, NewGenre};

/// Path prefix shared by every catalog page
pub const CATALOG_ROOT: &str = "/catalog";

/// Canonical path of a single record, e.g. `/catalog/author/{id}`
pub fn canonical_url(resource: &str, id: &Uuid) -> String {
    format!("{}/{}/{}", CATALOG_ROOT, resource, id)
}

/// Medium human readable date, e.g. `Oct 14, 1983`
pub fn format_medium_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
