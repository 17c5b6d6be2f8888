//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    validation, AppState,
};

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(catalog::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/catalog", get(catalog::index))
        // Authors
        .route("/catalog/authors", get(authors::list_authors))
        .route(
            "/catalog/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/catalog/author/:id", get(authors::get_author))
        .route(
            "/catalog/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/catalog/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Books
        .route("/catalog/books", get(books::list_books))
        .route(
            "/catalog/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/catalog/book/:id", get(books::get_book))
        .route(
            "/catalog/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        .route(
            "/catalog/book/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        // Book instances
        .route("/catalog/bookinstances", get(book_instances::list_instances))
        .route(
            "/catalog/bookinstance/create",
            get(book_instances::create_instance_form).post(book_instances::create_instance),
        )
        .route("/catalog/bookinstance/:id", get(book_instances::get_instance))
        .route(
            "/catalog/bookinstance/:id/update",
            get(book_instances::update_instance_form).post(book_instances::update_instance),
        )
        .route(
            "/catalog/bookinstance/:id/delete",
            get(book_instances::delete_instance_form).post(book_instances::delete_instance),
        )
        // Genres
        .route("/catalog/genres", get(genres::list_genres))
        .route(
            "/catalog/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/catalog/genre/:id", get(genres::get_genre))
        .route(
            "/catalog/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/catalog/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Parse a path identifier; anything that is not a UUID names no record
fn record_id(raw: &str, missing: &str) -> AppResult<Uuid> {
    validation::parse_id(raw).ok_or_else(|| AppError::NotFound(missing.to_string()))
}
