//! Home page

use axum::{extract::State, response::{Html, Redirect}};

use crate::{error::AppResult, AppState};

pub async fn root() -> Redirect {
    Redirect::to("/catalog")
}

/// Record counts; a store failure shows up on the page instead of failing it
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = state.services.catalog.index().await;
    state.views.render("index.html", page)
}
