//! Author pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;

use super::EntityId;
use crate::{
    error::AppResult,
    models::{Author, AuthorView, Book, BookView, CreateAuthor},
    services::Submission,
    validation::FieldError,
    AppState,
};

#[derive(Serialize)]
struct AuthorListPage {
    title: &'static str,
    author_list: Vec<AuthorView>,
}

#[derive(Serialize)]
struct AuthorDetailPage {
    title: &'static str,
    author: AuthorView,
    author_books: Vec<BookView>,
}

#[derive(Serialize)]
struct AuthorFormPage<'a> {
    title: &'static str,
    author: &'a CreateAuthor,
    errors: &'a [FieldError],
}

fn render_form(state: &AppState, form: &CreateAuthor, errors: &[FieldError]) -> AppResult<Html<String>> {
    state.templates.render(
        "author_form",
        &AuthorFormPage {
            title: "Create Author",
            author: form,
            errors,
        },
    )
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors ordered by family name", body = String, content_type = "text/html")
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors = state.services.authors.list().await?;
    state.templates.render(
        "author_list",
        &AuthorListPage {
            title: "Author List",
            author_list: authors.iter().map(Author::view).collect(),
        },
    )
}

/// Show an author and their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = uuid::Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author detail", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Html<String>> {
    let (author, books) = state.services.authors.detail(id).await?;
    state.templates.render(
        "author_detail",
        &AuthorDetailPage {
            title: "Author Detail",
            author: author.view(),
            author_books: books.iter().map(Book::view).collect(),
        },
    )
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Create author form", body = String, content_type = "text/html")
    )
)]
pub async fn create_author_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, &CreateAuthor::default(), &[])
}

/// Submit the author form
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body(content = CreateAuthor, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = String, content_type = "text/html"),
        (status = 303, description = "Created; redirect to the author page")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<CreateAuthor>,
) -> AppResult<Response> {
    match state.services.authors.create(form).await? {
        Submission::Saved(author) => Ok(Redirect::to(&author.url()).into_response()),
        Submission::Invalid(rejected) => {
            Ok(render_form(&state, &rejected.form, &rejected.errors)?.into_response())
        }
    }
}
