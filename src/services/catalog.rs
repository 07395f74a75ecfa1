//! Catalog overview service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::BookInstanceStatus, repository::Repository};

/// Record counts shown on the home page
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count every collection concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.books.count(),
                self.repository.book_instances.count(),
                self.repository
                    .book_instances
                    .count_by_status(BookInstanceStatus::Available),
                self.repository.authors.count(),
                self.repository.genres.count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }

    /// Cheap round trip to the store, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.genres.count().await.map(|_| ())
    }
}
