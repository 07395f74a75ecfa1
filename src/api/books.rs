//! Book pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Serialize;

use super::EntityId;
use crate::{
    error::AppResult,
    models::{Author, AuthorView, BookInstance, BookInstanceView, BookView, BookWithAuthor, CreateBook, Genre},
    services::Submission,
    validation::FieldError,
    AppState,
};

#[derive(Serialize)]
struct BookListPage {
    title: &'static str,
    book_list: Vec<BookView>,
}

#[derive(Serialize)]
struct BookDetailPage {
    title: String,
    book: BookView,
    book_instances: Vec<BookInstanceView>,
}

/// Genre checkbox on the book form
#[derive(Serialize)]
struct GenreOption {
    #[serde(flatten)]
    genre: Genre,
    checked: bool,
}

#[derive(Serialize)]
struct BookFormPage<'a> {
    title: &'static str,
    book: &'a CreateBook,
    author_list: Vec<AuthorView>,
    selected_author: &'a str,
    genre_list: Vec<GenreOption>,
    errors: &'a [FieldError],
}

async fn render_form(state: &AppState, form: &CreateBook, errors: &[FieldError]) -> AppResult<Html<String>> {
    let (authors, genres) = state.services.books.form_options().await?;
    state.templates.render(
        "book_form",
        &BookFormPage {
            title: "Create Book",
            book: form,
            author_list: authors.iter().map(Author::view).collect(),
            selected_author: &form.author,
            genre_list: genres
                .into_iter()
                .map(|genre| GenreOption {
                    checked: form.has_genre(&genre.id),
                    genre,
                })
                .collect(),
            errors,
        },
    )
}

/// List all books
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Books ordered by title, with their author", body = String, content_type = "text/html")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.books.list().await?;
    state.templates.render(
        "book_list",
        &BookListPage {
            title: "Book List",
            book_list: books.iter().map(BookWithAuthor::view).collect(),
        },
    )
}

/// Show a book, its genres and its copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Html<String>> {
    let (book, copies) = state.services.books.detail(id).await?;
    state.templates.render(
        "book_detail",
        &BookDetailPage {
            title: book.book.title.clone(),
            book: book.view(),
            book_instances: copies.iter().map(BookInstance::view).collect(),
        },
    )
}

/// Empty book form with authors and genres to pick from
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Create book form", body = String, content_type = "text/html")
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, &CreateBook::default(), &[]).await
}

/// Submit the book form; `genre` may be repeated
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body(content = CreateBook, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = String, content_type = "text/html"),
        (status = 303, description = "Created; redirect to the book page"),
        (status = 400, description = "Referenced author or genre does not exist")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<CreateBook>,
) -> AppResult<Response> {
    match state.services.books.create(form).await? {
        Submission::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        Submission::Invalid(rejected) => {
            Ok(render_form(&state, &rejected.form, &rejected.errors)
                .await?
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{app, send};
    use crate::services::test_support::Mocks;
    use axum::{body::Body, http::{header, Request, StatusCode}};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_rejected_form_keeps_genres_checked() {
        let (kept, other) = (Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks.books.expect_create().never();
        mocks.authors.expect_list().returning(|| Ok(vec![]));
        mocks.genres.expect_list().returning(move || {
            Ok(vec![
                Genre { id: kept, name: "Fantasy".to_string() },
                Genre { id: other, name: "History".to_string() },
            ])
        });

        let request = Request::post("/catalog/book/create")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("title=&summary=s&isbn=1&author=&genre={}", kept)))
            .unwrap();
        let (status, body) = send(app(mocks), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Title must not be empty."));
        assert!(body.contains("Author must not be empty."));
        assert!(body.contains(&format!("value=\"{}\" checked", kept)));
        assert!(!body.contains(&format!("value=\"{}\" checked", other)));
    }
}
