//! Book management service

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDetail, BookInstance, BookWithAuthor, CreateBook, Genre},
    repository::Repository,
    validation::check,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books with their author, title ascending
    pub async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.list().await
    }

    /// Book with author and genres, plus its copies
    pub async fn detail(&self, id: Uuid) -> AppResult<(BookDetail, Vec<BookInstance>)> {
        let (book, copies) = tokio::try_join!(
            self.repository.books.get_detail(id),
            self.repository.book_instances.list_by_book(id),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok((book, copies))
    }

    /// Authors and genres offered by the book form
    pub async fn form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list(),
        )
    }

    pub async fn create(&self, form: CreateBook) -> AppResult<Submission<Book, CreateBook>> {
        let record = match check(form) {
            Ok(record) => record,
            Err(rejected) => return Ok(Submission::Invalid(rejected)),
        };

        let book = self.repository.books.create(&record).await?;
        tracing::info!("Created book {:?} ({})", book.title, book.id);
        Ok(Submission::Saved(book))
    }
}
