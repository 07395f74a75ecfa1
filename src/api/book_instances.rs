//! Book instance (copy) pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;

use super::EntityId;
use crate::{
    error::AppResult,
    models::{BookInstanceStatus, BookInstanceView, BookInstanceWithBook, BookTitle, CreateBookInstance},
    services::Submission,
    validation::FieldError,
    AppState,
};

#[derive(Serialize)]
struct BookInstanceListPage {
    title: &'static str,
    bookinstance_list: Vec<BookInstanceView>,
}

#[derive(Serialize)]
struct BookInstanceDetailPage {
    title: String,
    bookinstance: BookInstanceView,
}

#[derive(Serialize)]
struct BookInstanceFormPage<'a> {
    title: &'static str,
    bookinstance: &'a CreateBookInstance,
    book_list: Vec<BookTitle>,
    selected_book: &'a str,
    status_list: Vec<&'static str>,
    errors: &'a [FieldError],
}

async fn render_form(
    state: &AppState,
    form: &CreateBookInstance,
    errors: &[FieldError],
) -> AppResult<Html<String>> {
    let books = state.services.book_instances.book_titles().await?;
    state.templates.render(
        "bookinstance_form",
        &BookInstanceFormPage {
            title: "Create BookInstance",
            bookinstance: form,
            book_list: books,
            selected_book: &form.book,
            status_list: BookInstanceStatus::ALL.iter().map(|s| s.as_str()).collect(),
            errors,
        },
    )
}

/// List all copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "All copies with their book", body = String, content_type = "text/html")
    )
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Html<String>> {
    let copies = state.services.book_instances.list().await?;
    state.templates.render(
        "bookinstance_list",
        &BookInstanceListPage {
            title: "Book Instance List",
            bookinstance_list: copies.iter().map(BookInstanceWithBook::view).collect(),
        },
    )
}

/// Show a single copy
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = uuid::Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy detail", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Html<String>> {
    let copy = state.services.book_instances.detail(id).await?;
    state.templates.render(
        "bookinstance_detail",
        &BookInstanceDetailPage {
            title: format!("Copy: {}", copy.book.title),
            bookinstance: copy.view(),
        },
    )
}

/// Empty copy form with the books to choose from
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Create copy form", body = String, content_type = "text/html")
    )
)]
pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, &CreateBookInstance::default(), &[]).await
}

/// Submit the copy form
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = CreateBookInstance, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = String, content_type = "text/html"),
        (status = 303, description = "Created; redirect to the copy page"),
        (status = 400, description = "Referenced book does not exist")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(form): Form<CreateBookInstance>,
) -> AppResult<Response> {
    match state.services.book_instances.create(form).await? {
        Submission::Saved(copy) => Ok(Redirect::to(&copy.url()).into_response()),
        Submission::Invalid(rejected) => {
            Ok(render_form(&state, &rejected.form, &rejected.errors)
                .await?
                .into_response())
        }
    }
}
