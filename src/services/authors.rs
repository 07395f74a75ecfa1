//! Author management service

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, CreateAuthor},
    repository::Repository,
    validation::check,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors, family name ascending
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author and the books they wrote, loaded concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<(Author, Vec<Book>)> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.get(id),
            self.repository.books.list_by_author(id),
        )?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok((author, books))
    }

    pub async fn create(&self, form: CreateAuthor) -> AppResult<Submission<Author, CreateAuthor>> {
        let record = match check(form) {
            Ok(record) => record,
            Err(rejected) => return Ok(Submission::Invalid(rejected)),
        };

        let author = self.repository.authors.create(&record).await?;
        tracing::info!("Created author {} ({})", author.name(), author.id);
        Ok(Submission::Saved(author))
    }
}
