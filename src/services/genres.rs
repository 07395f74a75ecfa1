//! Genre management service

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateGenre, Genre},
    repository::{GenreInsert, Repository},
    validation::check,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres, name ascending
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Genre and the books filed under it, loaded concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<(Genre, Vec<Book>)> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.get(id),
            self.repository.books.list_by_genre(id),
        )?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok((genre, books))
    }

    /// Create a genre unless one with the same name (ignoring case) exists.
    pub async fn create(&self, form: CreateGenre) -> AppResult<Submission<GenreInsert, CreateGenre>> {
        let record = match check(form) {
            Ok(record) => record,
            Err(rejected) => return Ok(Submission::Invalid(rejected)),
        };

        if let Some(existing) = self.repository.genres.find_by_name(&record.name).await? {
            tracing::debug!("Genre {:?} already exists as {}", record.name, existing.id);
            return Ok(Submission::Saved(GenreInsert::Existing(existing)));
        }

        let inserted = self.repository.genres.create(&record).await?;
        match &inserted {
            GenreInsert::Created(genre) => {
                tracing::info!("Created genre {:?} ({})", genre.name, genre.id)
            }
            GenreInsert::Existing(genre) => {
                tracing::debug!("Genre {:?} was created concurrently as {}", genre.name, genre.id)
            }
        }
        Ok(Submission::Saved(inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Mocks;

    fn fantasy() -> Genre {
        Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_skips_insert() {
        let existing = fantasy();
        let expected = existing.clone();
        let mut mocks = Mocks::new();
        mocks
            .genres
            .expect_find_by_name()
            .withf(|name: &str| name == "fantasy")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mocks.genres.expect_create().never();

        let service = GenresService::new(mocks.into_repository());
        let form = CreateGenre {
            name: "  fantasy ".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Saved(GenreInsert::Existing(genre)) => assert_eq!(genre, expected),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_name_rejected() {
        let mut mocks = Mocks::new();
        mocks.genres.expect_find_by_name().never();
        mocks.genres.expect_create().never();

        let service = GenresService::new(mocks.into_repository());
        let form = CreateGenre {
            name: " ab ".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Invalid(rejected) => {
                assert_eq!(rejected.form.name, "ab");
                assert_eq!(
                    rejected.errors[0].message,
                    "Genre name must contain at least 3 characters"
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_new_name_is_created() {
        let mut mocks = Mocks::new();
        mocks.genres.expect_find_by_name().returning(|_| Ok(None));
        mocks.genres.expect_create().times(1).returning(|genre| {
            Ok(GenreInsert::Created(Genre {
                id: Uuid::new_v4(),
                name: genre.name.clone(),
            }))
        });

        let service = GenresService::new(mocks.into_repository());
        let form = CreateGenre {
            name: "History".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Saved(GenreInsert::Created(genre)) => assert_eq!(genre.name, "History"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
