//! Repository layer: one store per collection.
//!
//! Handlers only see the store traits; `Repository::new` wires the PostgreSQL
//! implementations, `Repository::in_memory` a process-local one.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookDetail, BookInstance, BookInstanceStatus, BookInstanceWithBook,
        BookTitle, BookWithAuthor, Genre, NewAuthor, NewBook, NewBookInstance, NewGenre,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Author>>;

    async fn create(&self, author: &NewAuthor) -> AppResult<Author>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by title, with their author
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>>;

    /// Ids and titles ordered by title
    async fn list_titles(&self) -> AppResult<Vec<BookTitle>>;

    /// Book with author and genres resolved
    async fn get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>>;

    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;

    async fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All copies, in storage order, with their book
    async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>>;

    async fn list_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;

    async fn create(&self, instance: &NewBookInstance) -> AppResult<BookInstance>;

    async fn count(&self) -> AppResult<i64>;

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
}

/// Result of inserting a genre whose name must be unique
#[derive(Debug, Clone, PartialEq)]
pub enum GenreInsert {
    Created(Genre),
    /// A genre with the same name (ignoring case) was already stored
    Existing(Genre),
}

impl GenreInsert {
    pub fn genre(&self) -> &Genre {
        match self {
            GenreInsert::Created(genre) | GenreInsert::Existing(genre) => genre,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;

    /// Insert unless the name is taken; atomic with respect to other inserts
    async fn create(&self, genre: &NewGenre) -> AppResult<GenreInsert>;

    async fn count(&self) -> AppResult<i64>;
}

/// Store handles shared by every handler
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
    pub genres: Arc<dyn GenreStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool)),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(memory::MemoryStore::default()))
    }

    pub fn from_memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            authors: store.clone(),
            books: store.clone(),
            book_instances: store.clone(),
            genres: store,
        }
    }
}
