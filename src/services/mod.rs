//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::{repository::Repository, validation::Rejected};

/// Outcome of a create form submission
#[derive(Debug)]
pub enum Submission<T, F> {
    /// The record was stored (or resolved to an existing one)
    Saved(T),
    /// The form failed validation; nothing was written
    Invalid(Rejected<F>),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub genres: genres::GenresService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            genres: genres::GenresService::new(repository),
        }
    }
}
