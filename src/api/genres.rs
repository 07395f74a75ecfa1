//! Genre pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;

use super::EntityId;
use crate::{
    error::AppResult,
    models::{Book, BookView, CreateGenre, Genre, GenreView},
    services::Submission,
    validation::FieldError,
    AppState,
};

#[derive(Serialize)]
struct GenreListPage {
    title: &'static str,
    genre_list: Vec<GenreView>,
}

#[derive(Serialize)]
struct GenreDetailPage {
    title: &'static str,
    genre: GenreView,
    genre_books: Vec<BookView>,
}

#[derive(Serialize)]
struct GenreFormPage<'a> {
    title: &'static str,
    genre: &'a CreateGenre,
    errors: &'a [FieldError],
}

fn render_form(state: &AppState, form: &CreateGenre, errors: &[FieldError]) -> AppResult<Html<String>> {
    state.templates.render(
        "genre_form",
        &GenreFormPage {
            title: "Create Genre",
            genre: form,
            errors,
        },
    )
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres ordered by name", body = String, content_type = "text/html")
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Html<String>> {
    let genres = state.services.genres.list().await?;
    state.templates.render(
        "genre_list",
        &GenreListPage {
            title: "Genre List",
            genre_list: genres.iter().map(Genre::view).collect(),
        },
    )
}

/// Show a genre and the books filed under it
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = uuid::Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre detail", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Html<String>> {
    let (genre, books) = state.services.genres.detail(id).await?;
    state.templates.render(
        "genre_detail",
        &GenreDetailPage {
            title: "Genre Detail",
            genre: genre.view(),
            genre_books: books.iter().map(Book::view).collect(),
        },
    )
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Create genre form", body = String, content_type = "text/html")
    )
)]
pub async fn create_genre_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, &CreateGenre::default(), &[])
}

/// Submit the genre form; an existing genre with the same name is reused
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body(content = CreateGenre, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = String, content_type = "text/html"),
        (status = 303, description = "Redirect to the new or existing genre")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Form(form): Form<CreateGenre>,
) -> AppResult<Response> {
    match state.services.genres.create(form).await? {
        Submission::Saved(inserted) => Ok(Redirect::to(&inserted.genre().url()).into_response()),
        Submission::Invalid(rejected) => {
            Ok(render_form(&state, &rejected.form, &rejected.errors)?.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{app, get, send};
    use crate::services::test_support::Mocks;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_keeps_store_order() {
        let mut mocks = Mocks::new();
        mocks.genres.expect_list().returning(|| {
            Ok(["Fantasy", "History"]
                .into_iter()
                .map(|name| Genre {
                    id: uuid::Uuid::new_v4(),
                    name: name.to_string(),
                })
                .collect())
        });

        let (status, body) = send(app(mocks), get("/catalog/genres")).await;
        assert_eq!(status, StatusCode::OK);
        let fantasy = body.find("Fantasy").unwrap();
        let history = body.find("History").unwrap();
        assert!(fantasy < history);
    }

    #[tokio::test]
    async fn test_empty_form() {
        let (status, body) = send(app(Mocks::new()), get("/catalog/genre/create")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Create Genre</title>"));
        assert!(body.contains("name=\"name\""));
    }
}
