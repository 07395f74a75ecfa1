//! Books repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::AppResult,
    models::{Author, Book, BookDetail, BookTitle, BookWithAuthor, Genre, NewBook},
};

/// Genre ids of a book, in selection order
const GENRE_IDS: &str =
    "ARRAY(SELECT bg.genre_id FROM book_genres bg WHERE bg.book_id = b.id ORDER BY bg.position)";

/// Book row joined with its author
#[derive(FromRow)]
struct BookAuthorRow {
    id: Uuid,
    title: String,
    summary: String,
    isbn: String,
    author_id: Uuid,
    genre_ids: Vec<Uuid>,
    first_name: String,
    family_name: String,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
}

impl From<BookAuthorRow> for BookWithAuthor {
    fn from(row: BookAuthorRow) -> Self {
        BookWithAuthor {
            author: Author {
                id: row.author_id,
                first_name: row.first_name,
                family_name: row.family_name,
                date_of_birth: row.date_of_birth,
                date_of_death: row.date_of_death,
            },
            book: Book {
                id: row.id,
                title: row.title,
                summary: row.summary,
                isbn: row.isbn,
                author_id: row.author_id,
                genre_ids: row.genre_ids,
            },
        }
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn select_with_author(filter: &str) -> String {
        format!(
            r#"
            SELECT b.id, b.title, b.summary, b.isbn, b.author_id, {GENRE_IDS} AS genre_ids,
                   a.first_name, a.family_name, a.date_of_birth, a.date_of_death
            FROM books b
            JOIN authors a ON a.id = b.author_id
            {filter}
            ORDER BY b.title
            "#
        )
    }

    fn select_books(filter: &str) -> String {
        format!(
            r#"
            SELECT b.id, b.title, b.summary, b.isbn, b.author_id, {GENRE_IDS} AS genre_ids
            FROM books b
            {filter}
            ORDER BY b.title
            "#
        )
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        let rows = sqlx::query_as::<_, BookAuthorRow>(&Self::select_with_author(""))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookWithAuthor::from).collect())
    }

    async fn list_titles(&self) -> AppResult<Vec<BookTitle>> {
        let rows = sqlx::query_as::<_, BookTitle>("SELECT id, title FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let Some(row) =
            sqlx::query_as::<_, BookAuthorRow>(&Self::select_with_author("WHERE b.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY bg.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let BookWithAuthor { book, author } = row.into();
        Ok(Some(BookDetail {
            book,
            author,
            genres,
        }))
    }

    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&Self::select_books("WHERE b.author_id = $1"))
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&Self::select_books(
            "WHERE EXISTS (SELECT 1 FROM book_genres x WHERE x.book_id = b.id AND x.genre_id = $1)",
        ))
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .execute(&mut *tx)
        .await?;

        for (position, genre_id) in book.genre_ids.iter().enumerate() {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id, position) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(genre_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Book {
            id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            author_id: book.author_id,
            genre_ids: book.genre_ids.clone(),
        })
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
