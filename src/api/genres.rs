//! Genre pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use super::record_id;
use crate::{
    error::AppResult,
    models::GenreForm,
    services::{Deletion, Submission},
    validation, AppState,
};

const LIST_URL: &str = "/catalog/genres";
const MISSING: &str = "Genre not found";

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.genres.list().await?;
    state.views.render("genre_list.html", page)
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.genres.detail(id).await?;
    state.views.render("genre_detail.html", page)
}

pub async fn create_genre_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state
        .views
        .render("genre_form.html", state.services.genres.create_form())
}

/// Redirects to the existing genre when the name is already taken
pub async fn create_genre(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.genres.create(form).await? {
        Submission::Accepted(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("genre_form.html", page)?.into_response()),
    }
}

pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.genres.update_form(id).await?;
    state.views.render("genre_form.html", page)
}

pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let id = record_id(&id, MISSING)?;
    match state.services.genres.update(id, form).await? {
        Submission::Accepted(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        Submission::Rejected(page) => Ok(state.views.render("genre_form.html", page)?.into_response()),
    }
}

pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.genres.delete_form(id).await? {
        Some(page) => Ok(state.views.render("genre_delete.html", page)?.into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.genres.delete(id).await? {
        Deletion::Removed => Ok(Redirect::to(LIST_URL).into_response()),
        Deletion::Blocked(page) => Ok(state.views.render("genre_delete.html", page)?.into_response()),
    }
}
