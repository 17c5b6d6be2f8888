//! Book instance (copy) pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use super::record_id;
use crate::{
    error::AppResult,
    models::BookInstanceForm,
    services::{Deletion, Submission},
    validation, AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";
const MISSING: &str = "Book copy not found";

pub async fn list_instances(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.book_instances.list().await?;
    state.views.render("bookinstance_list.html", page)
}

pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.book_instances.detail(id).await?;
    state.views.render("bookinstance_detail.html", page)
}

pub async fn create_instance_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.book_instances.create_form().await?;
    state.views.render("bookinstance_form.html", page)
}

pub async fn create_instance(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    match state.services.book_instances.create(form).await? {
        Submission::Accepted(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        Submission::Rejected(page) => Ok(state
            .views
            .render("bookinstance_form.html", page)?
            .into_response()),
    }
}

pub async fn update_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id, MISSING)?;
    let page = state.services.book_instances.update_form(id).await?;
    state.views.render("bookinstance_form.html", page)
}

pub async fn update_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let id = record_id(&id, MISSING)?;
    match state.services.book_instances.update(id, form).await? {
        Submission::Accepted(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        Submission::Rejected(page) => Ok(state
            .views
            .render("bookinstance_form.html", page)?
            .into_response()),
    }
}

pub async fn delete_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.book_instances.delete_form(id).await? {
        Some(page) => Ok(state
            .views
            .render("bookinstance_delete.html", page)?
            .into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    match state.services.book_instances.delete(id).await? {
        Deletion::Removed => Ok(Redirect::to(LIST_URL).into_response()),
        Deletion::Blocked(page) => Ok(state
            .views
            .render("bookinstance_delete.html", page)?
            .into_response()),
    }
}
