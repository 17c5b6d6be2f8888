//! Author pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use super::record_id;
use crate::{
    error::AppResult,
    models::AuthorForm,
    services::{Deletion, Submission},
    validation, AppState,
};

const LIST_URL: &str = "/catalog/authors";
const MISSING: &str = "Author not found";

pub async fn list_authors(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.authors.list().await?;
    state.views.render("author_list.html", page)
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.authors.detail(id).await?;
    state.views.render("author_detail.html", page)
}

pub async fn create_author_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state
        .views
        .render("author_form.html", state.services.authors.create_form())
}

pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.authors.create(form).await? {
        Submission::Accepted(author) => Ok(Redirect::to(&author.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("author_form.html", page)?.into_response()),
    }
}

pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.authors.update_form(id).await?;
    state.views.render("author_form.html", page)
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let id = record_id(&id, MISSING)?;
    match state.services.authors.update(id, form).await? {
        Submission::Accepted(author) => Ok(Redirect::to(&author.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("author_form.html", page)?.into_response()),
    }
}

pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.authors.delete_form(id).await? {
        Some(page) => Ok(state.views.render("author_delete.html", page)?.into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.authors.delete(id).await? {
        Deletion::Removed => Ok(Redirect::to(LIST_URL).into_response()),
        Deletion::Blocked(page) => Ok(state.views.render("author_delete.html", page)?.into_response()),
    }
}
