//! Book instances repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::BookInstanceStore;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceStatus, BookInstanceWithBook, BookTitle, NewBookInstance},
};

#[derive(FromRow)]
struct BookInstanceRow {
    id: Uuid,
    book_id: Uuid,
    imprint: String,
    status: String,
    due_back: DateTime<Utc>,
}

impl TryFrom<BookInstanceRow> for BookInstance {
    type Error = AppError;

    fn try_from(row: BookInstanceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookInstanceStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(BookInstance {
            id: row.id,
            book_id: row.book_id,
            imprint: row.imprint,
            status,
            due_back: row.due_back,
        })
    }
}

#[derive(FromRow)]
struct BookInstanceBookRow {
    #[sqlx(flatten)]
    instance: BookInstanceRow,
    book_title: String,
}

impl TryFrom<BookInstanceBookRow> for BookInstanceWithBook {
    type Error = AppError;

    fn try_from(row: BookInstanceBookRow) -> Result<Self, Self::Error> {
        let instance = BookInstance::try_from(row.instance)?;
        Ok(BookInstanceWithBook {
            book: BookTitle {
                id: instance.book_id,
                title: row.book_title,
            },
            instance,
        })
    }
}

const SELECT_WITH_BOOK: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let rows = sqlx::query_as::<_, BookInstanceBookRow>(SELECT_WITH_BOOK)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(BookInstanceWithBook::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_BOOK);
        let row = sqlx::query_as::<_, BookInstanceBookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(BookInstanceWithBook::try_from).transpose()
    }

    async fn list_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            "SELECT * FROM book_instances WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookInstance::try_from).collect()
    }

    async fn create(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
