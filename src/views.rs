//! Page rendering with minijinja
//!
//! Templates are compiled into the binary. Submitted text is HTML-escaped when
//! it is validated, before it is stored, so the environment renders values
//! verbatim instead of escaping them a second time.

use std::sync::Arc;

use axum::response::Html;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::error::AppResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("author_list.html", include_str!("../templates/author_list.html")),
    ("author_detail.html", include_str!("../templates/author_detail.html")),
    ("author_form.html", include_str!("../templates/author_form.html")),
    ("author_delete.html", include_str!("../templates/author_delete.html")),
    ("book_list.html", include_str!("../templates/book_list.html")),
    ("book_detail.html", include_str!("../templates/book_detail.html")),
    ("book_form.html", include_str!("../templates/book_form.html")),
    ("book_delete.html", include_str!("../templates/book_delete.html")),
    ("bookinstance_list.html", include_str!("../templates/bookinstance_list.html")),
    ("bookinstance_detail.html", include_str!("../templates/bookinstance_detail.html")),
    ("bookinstance_form.html", include_str!("../templates/bookinstance_form.html")),
    ("bookinstance_delete.html", include_str!("../templates/bookinstance_delete.html")),
    ("genre_list.html", include_str!("../templates/genre_list.html")),
    ("genre_detail.html", include_str!("../templates/genre_detail.html")),
    ("genre_form.html", include_str!("../templates/genre_form.html")),
    ("genre_delete.html", include_str!("../templates/genre_delete.html")),
];

/// Shared template environment
#[derive(Clone)]
pub struct Views {
    env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    /// Render `name` with `data` as the template context
    pub fn render<S: Serialize>(&self, name: &str, data: S) -> AppResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn every_template_compiles() {
        let views = Views::new().unwrap();
        for &(name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn stored_values_are_not_escaped_twice() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "genre_form.html",
                context! {
                    title => "Create Genre",
                    genre => context! { name => "Sci&#x2F;Fi" },
                    errors => Vec::<()>::new(),
                },
            )
            .unwrap();
        assert!(html.0.contains("Sci&#x2F;Fi"));
        assert!(!html.0.contains("&amp;#x2F;"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let views = Views::new().unwrap();
        assert!(views.render("missing.html", context! {}).is_err());
    }
}
