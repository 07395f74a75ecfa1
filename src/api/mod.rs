//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    routing::{get, MethodRouter},
    Router,
};
use uuid::Uuid;

use crate::{error::AppError, validation::parse_reference, AppState};

/// Record identifier taken from the `:id` path segment.
///
/// Malformed identifiers are rejected here, so handlers never reach the
/// store with them.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidReference(e.body_text()))?;

        parse_reference(&raw)
            .map(EntityId)
            .ok_or_else(|| AppError::InvalidReference(format!("{} is not a valid identifier", raw)))
    }
}

/// Text returned by the delete and update placeholders
pub fn not_implemented(resource: &str, action: &str, method: &str) -> String {
    format!("NOT IMPLEMENTED: {} {} {}", resource, action, method)
}

fn placeholder(resource: &'static str, action: &'static str) -> MethodRouter<AppState> {
    get(move || async move { not_implemented(resource, action, "GET") })
        .post(move || async move { not_implemented(resource, action, "POST") })
}

/// Routes mounted under `/catalog`
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route("/author/:id/delete", placeholder("Author", "delete"))
        .route("/author/:id/update", placeholder("Author", "update"))
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/book/:id", get(books::get_book))
        .route("/book/:id/delete", placeholder("Book", "delete"))
        .route("/book/:id/update", placeholder("Book", "update"))
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form)
                .post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route("/bookinstance/:id/delete", placeholder("BookInstance", "delete"))
        .route("/bookinstance/:id/update", placeholder("BookInstance", "update"))
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route("/genre/:id/delete", placeholder("Genre", "delete"))
        .route("/genre/:id/update", placeholder("Genre", "update"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::{services::test_support::Mocks, AppState};

    pub fn app(mocks: Mocks) -> Router {
        let state = AppState::new(mocks.into_repository()).expect("state builds");
        crate::app(state)
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.expect("infallible");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request")
    }
}
