//! Page rendering with Liquid templates.
//!
//! Each view renders its own body; the result is then wrapped in the shared
//! layout. Templates are compiled into the binary and parsed once at startup.

use std::collections::HashMap;

use axum::response::Html;
use serde::Serialize;

use crate::error::{AppError, AppResult};

const LAYOUT: &str = include_str!("../templates/layout.liquid");

const VIEWS: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.liquid")),
    ("author_list", include_str!("../templates/author_list.liquid")),
    ("author_detail", include_str!("../templates/author_detail.liquid")),
    ("author_form", include_str!("../templates/author_form.liquid")),
    ("book_list", include_str!("../templates/book_list.liquid")),
    ("book_detail", include_str!("../templates/book_detail.liquid")),
    ("book_form", include_str!("../templates/book_form.liquid")),
    ("bookinstance_list", include_str!("../templates/bookinstance_list.liquid")),
    ("bookinstance_detail", include_str!("../templates/bookinstance_detail.liquid")),
    ("bookinstance_form", include_str!("../templates/bookinstance_form.liquid")),
    ("genre_list", include_str!("../templates/genre_list.liquid")),
    ("genre_detail", include_str!("../templates/genre_detail.liquid")),
    ("genre_form", include_str!("../templates/genre_form.liquid")),
];

pub struct Templates {
    layout: liquid::Template,
    views: HashMap<&'static str, liquid::Template>,
}

impl Templates {
    /// Parse the layout and every view
    pub fn new() -> AppResult<Self> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        let layout = parser.parse(LAYOUT)?;
        let views = VIEWS
            .iter()
            .map(|(name, source)| Ok((*name, parser.parse(source)?)))
            .collect::<AppResult<HashMap<_, _>>>()?;

        tracing::debug!("Parsed {} page templates", views.len());
        Ok(Self { layout, views })
    }

    /// Render `view` with `payload` and wrap it in the layout.
    ///
    /// The payload must serialize to a map; its `title` entry is also used as
    /// the page title.
    pub fn render<T: Serialize>(&self, view: &str, payload: &T) -> AppResult<Html<String>> {
        let template = self
            .views
            .get(view)
            .ok_or_else(|| AppError::Internal(format!("Unknown view {}", view)))?;

        let mut globals = liquid::to_object(payload)?;
        let content = template.render(&globals)?;

        globals.insert("content".into(), liquid::model::Value::scalar(content));
        if !globals.contains_key("title") {
            globals.insert("title".into(), liquid::model::Value::scalar("Local Library"));
        }

        Ok(Html(self.layout.render(&globals)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn templates() -> Templates {
        Templates::new().expect("templates parse")
    }

    #[test]
    fn test_every_view_parses() {
        assert_eq!(templates().views.len(), VIEWS.len());
    }

    #[test]
    fn test_render_wraps_in_layout() {
        let Html(page) = templates()
            .render(
                "genre_list",
                &json!({
                    "title": "Genre List",
                    "genre_list": [
                        {"id": "1", "name": "Fantasy", "url": "/catalog/genre/1"},
                    ],
                }),
            )
            .unwrap();
        assert!(page.contains("<title>Genre List</title>"));
        assert!(page.contains("<a href=\"/catalog/genre/1\">Fantasy</a>"));
        assert!(page.contains("href=\"/catalog/books\""));
    }

    #[test]
    fn test_unknown_view() {
        let err = templates().render("nope", &json!({})).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_form_errors_listed() {
        let Html(page) = templates()
            .render(
                "genre_form",
                &json!({
                    "title": "Create Genre",
                    "genre": {"name": "ab"},
                    "errors": [{"field": "name", "message": "Genre name must contain at least 3 characters"}],
                }),
            )
            .unwrap();
        assert!(page.contains("Genre name must contain at least 3 characters"));
        assert!(page.contains("value=\"ab\""));
    }
}
