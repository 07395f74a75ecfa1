//! Catalog home page

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use serde::Serialize;

use crate::{error::AppResult, models::CATALOG_ROOT, services::catalog::CatalogCounts, AppState};

#[derive(Serialize)]
struct IndexPage {
    title: &'static str,
    #[serde(flatten)]
    counts: CatalogCounts,
}

/// Home page with record counts
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog home page", body = String, content_type = "text/html")
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let counts = state.services.catalog.counts().await?;
    state.templates.render(
        "index",
        &IndexPage {
            title: "Local Library Home",
            counts,
        },
    )
}

/// Site root
pub async fn home() -> Redirect {
    Redirect::to(CATALOG_ROOT)
}
