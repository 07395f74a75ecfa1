//! In-memory store, used by tests and for running without a database.
//!
//! Mirrors the PostgreSQL schema constraints: references must exist and
//! genre names are unique ignoring case.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreInsert, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookDetail, BookInstance, BookInstanceStatus, BookInstanceWithBook,
        BookTitle, BookWithAuthor, Genre, NewAuthor, NewBook, NewBookInstance, NewGenre,
    },
};

#[derive(Debug, Default)]
struct Collections {
    authors: Vec<Author>,
    books: Vec<Book>,
    book_instances: Vec<BookInstance>,
    genres: Vec<Genre>,
}

impl Collections {
    fn author(&self, id: &Uuid) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == *id)
    }

    fn book(&self, id: &Uuid) -> Option<&Book> {
        self.books.iter().find(|b| b.id == *id)
    }

    fn genre(&self, id: &Uuid) -> Option<&Genre> {
        self.genres.iter().find(|g| g.id == *id)
    }

    fn genre_named(&self, name: &str) -> Option<&Genre> {
        let name = name.to_lowercase();
        self.genres.iter().find(|g| g.name.to_lowercase() == name)
    }

    fn with_book(&self, instance: &BookInstance) -> AppResult<BookInstanceWithBook> {
        let book = self
            .book(&instance.book_id)
            .ok_or_else(|| dangling("book", &instance.book_id))?;
        Ok(BookInstanceWithBook {
            instance: instance.clone(),
            book: BookTitle::from(book),
        })
    }

    fn with_author(&self, book: &Book) -> AppResult<BookWithAuthor> {
        let author = self
            .author(&book.author_id)
            .ok_or_else(|| dangling("author", &book.author_id))?;
        Ok(BookWithAuthor {
            book: book.clone(),
            author: author.clone(),
        })
    }

    fn sorted_books<'a>(&'a self, keep: impl Fn(&Book) -> bool) -> Vec<&'a Book> {
        let mut books: Vec<&Book> = self.books.iter().filter(|b| keep(*b)).collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        books
    }
}

fn dangling(kind: &str, id: &Uuid) -> AppError {
    AppError::Internal(format!("Stored reference to missing {} {}", kind, id))
}

fn missing_reference() -> AppError {
    AppError::BadRequest("Referenced record does not exist".to_string())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    fn read(&self) -> AppResult<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let mut authors = self.read()?.authors.clone();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.read()?.author(&id).cloned())
    }

    async fn create(&self, author: &NewAuthor) -> AppResult<Author> {
        let created = Author {
            id: Uuid::new_v4(),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        };
        self.write()?.authors.push(created.clone());
        Ok(created)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.authors.len() as i64)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        let data = self.read()?;
        data.sorted_books(|_| true)
            .into_iter()
            .map(|b| data.with_author(b))
            .collect()
    }

    async fn list_titles(&self) -> AppResult<Vec<BookTitle>> {
        let data = self.read()?;
        Ok(data
            .sorted_books(|_| true)
            .into_iter()
            .map(BookTitle::from)
            .collect())
    }

    async fn get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let data = self.read()?;
        let Some(book) = data.book(&id) else {
            return Ok(None);
        };
        let BookWithAuthor { book, author } = data.with_author(book)?;
        let genres = book
            .genre_ids
            .iter()
            .map(|g| data.genre(g).cloned().ok_or_else(|| dangling("genre", g)))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Some(BookDetail {
            book,
            author,
            genres,
        }))
    }

    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let data = self.read()?;
        Ok(data
            .sorted_books(|b| b.author_id == author_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let data = self.read()?;
        Ok(data
            .sorted_books(|b| b.genre_ids.contains(&genre_id))
            .into_iter()
            .cloned()
            .collect())
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut data = self.write()?;
        if data.author(&book.author_id).is_none()
            || book.genre_ids.iter().any(|g| data.genre(g).is_none())
        {
            return Err(missing_reference());
        }
        let created = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            author_id: book.author_id,
            genre_ids: book.genre_ids.clone(),
        };
        data.books.push(created.clone());
        Ok(created)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.books.len() as i64)
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let data = self.read()?;
        data.book_instances
            .iter()
            .map(|i| data.with_book(i))
            .collect()
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>> {
        let data = self.read()?;
        data.book_instances
            .iter()
            .find(|i| i.id == id)
            .map(|i| data.with_book(i))
            .transpose()
    }

    async fn list_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        Ok(self
            .read()?
            .book_instances
            .iter()
            .filter(|i| i.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn create(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let mut data = self.write()?;
        if data.book(&instance.book_id).is_none() {
            return Err(missing_reference());
        }
        let created = BookInstance {
            id: Uuid::new_v4(),
            book_id: instance.book_id,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
        };
        data.book_instances.push(created.clone());
        Ok(created)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.book_instances.len() as i64)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        Ok(self
            .read()?
            .book_instances
            .iter()
            .filter(|i| i.status == status)
            .count() as i64)
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.read()?.genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.read()?.genre(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        Ok(self.read()?.genre_named(name).cloned())
    }

    async fn create(&self, genre: &NewGenre) -> AppResult<GenreInsert> {
        let mut data = self.write()?;
        if let Some(existing) = data.genre_named(&genre.name) {
            return Ok(GenreInsert::Existing(existing.clone()));
        }
        let created = Genre {
            id: Uuid::new_v4(),
            name: genre.name.clone(),
        };
        data.genres.push(created.clone());
        Ok(GenreInsert::Created(created))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.genres.len() as i64)
    }
}
