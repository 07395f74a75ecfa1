//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, catalog, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library",
        version = "1.0.0",
        description = "Server-rendered library catalog: authors, books, copies and genres",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        catalog::index,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book_form,
        books::create_book,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
    ),
    components(
        schemas(
            crate::models::Author,
            crate::models::CreateAuthor,
            crate::models::Book,
            crate::models::BookTitle,
            crate::models::CreateBook,
            crate::models::BookInstance,
            crate::models::BookInstanceStatus,
            crate::models::CreateBookInstance,
            crate::models::Genre,
            crate::models::CreateGenre,
            crate::services::catalog::CatalogCounts,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home page"),
        (name = "authors", description = "Author pages"),
        (name = "books", description = "Book pages"),
        (name = "bookinstances", description = "Book copy pages"),
        (name = "genres", description = "Genre pages")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
