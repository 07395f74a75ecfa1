//! Book instance (copy) service

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceWithBook, BookTitle, CreateBookInstance},
    repository::Repository,
    validation::check,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        self.repository.book_instances.list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceWithBook> {
        self.repository
            .book_instances
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Books a copy can be attached to, title ascending
    pub async fn book_titles(&self) -> AppResult<Vec<BookTitle>> {
        self.repository.books.list_titles().await
    }

    pub async fn create(
        &self,
        form: CreateBookInstance,
    ) -> AppResult<Submission<BookInstance, CreateBookInstance>> {
        let record = match check(form) {
            Ok(record) => record,
            Err(rejected) => return Ok(Submission::Invalid(rejected)),
        };

        let instance = self.repository.book_instances.create(&record).await?;
        tracing::info!(
            "Created copy {} of book {} ({})",
            instance.id,
            instance.book_id,
            instance.status
        );
        Ok(Submission::Saved(instance))
    }
}
