//! Book pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use super::record_id;
use crate::{
    error::AppResult,
    models::BookForm,
    services::{Deletion, Submission},
    validation, AppState,
};

const LIST_URL: &str = "/catalog/books";
const MISSING: &str = "Book not found";

pub async fn list_books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.books.list().await?;
    state.views.render("book_list.html", page)
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.books.detail(id).await?;
    state.views.render("book_detail.html", page)
}

/// Form with every author and genre to choose from
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.books.create_form().await?;
    state.views.render("book_form.html", page)
}

/// `genre` may be submitted zero, one or many times
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(form).await? {
        Submission::Accepted(book) => Ok(Redirect::to(&book.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("book_form.html", page)?.into_response()),
    }
}

pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.books.update_form(id).await?;
    state.views.render("book_form.html", page)
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = record_id(&id, MISSING)?;
    match state.services.books.update(id, form).await? {
        Submission::Accepted(book) => Ok(Redirect::to(&book.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("book_form.html", page)?.into_response()),
    }
}

pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.books.delete_form(id).await? {
        Some(page) => Ok(state.views.render("book_delete.html", page)?.into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.books.delete(id).await? {
        Deletion::Removed => Ok(Redirect::to(LIST_URL).into_response()),
        Deletion::Blocked(page) => Ok(state.views.render("book_delete.html", page)?.into_response()),
    }
}
