//! Genres repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{GenreInsert, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{Genre, NewGenre},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for GenresRepository {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE lower(name) = lower($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, genre: &NewGenre) -> AppResult<GenreInsert> {
        // The unique index on lower(name) turns a concurrent duplicate into a no-op
        let inserted = sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (id, name)
            VALUES ($1, $2)
            ON CONFLICT ((lower(name))) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&genre.name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(created) = inserted {
            return Ok(GenreInsert::Created(created));
        }

        self.find_by_name(&genre.name)
            .await?
            .map(GenreInsert::Existing)
            .ok_or_else(|| {
                AppError::Internal(format!("Genre {} conflicted but was not found", genre.name))
            })
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
