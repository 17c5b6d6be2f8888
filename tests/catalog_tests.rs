//! Catalog page tests against the in-memory store

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use local_library::{api, repository::Repository, AppState};

fn app() -> Router {
    let state = AppState::new(Repository::in_memory())
        .expect("templates should compile");
    api::router(state)
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    Reply {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

async fn get(app: &Router, uri: &str) -> Reply {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// `form` must already be URL-encoded
async fn post(app: &Router, uri: &str, form: &str) -> Reply {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// Submit a create form and return the new record's detail URL
async fn create(app: &Router, kind: &str, form: &str) -> String {
    let reply = post(app, &format!("/catalog/{kind}/create"), form).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}", reply.body);
    reply.location.unwrap()
}

fn id_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

async fn herbert(app: &Router) -> String {
    create(app, "author", "first_name=Frank&family_name=Herbert").await
}

#[tokio::test]
async fn root_redirects_to_catalog() {
    let app = app();
    let reply = get(&app, "/").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn home_page_counts_records() {
    let app = app();
    let author = herbert(&app).await;
    create(&app, "genre", "name=Science+Fiction").await;
    let book = create(
        &app,
        "book",
        &format!("title=Dune&author={}&summary=desert+planet&isbn=9780441013593", id_of(&author)),
    )
    .await;
    create(
        &app,
        "bookinstance",
        &format!("book={}&imprint=Ace&status=Available", id_of(&book)),
    )
    .await;
    create(&app, "bookinstance", &format!("book={}&imprint=Gollancz", id_of(&book))).await;

    let reply = get(&app, "/catalog").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<strong>Books:</strong> 1"));
    assert!(reply.body.contains("<strong>Copies:</strong> 2"));
    assert!(reply.body.contains("<strong>Copies available:</strong> 1"));
    assert!(reply.body.contains("<strong>Authors:</strong> 1"));
    assert!(reply.body.contains("<strong>Genres:</strong> 1"));
}

#[tokio::test]
async fn created_author_shows_sanitized_values() {
    let app = app();
    let url = create(
        &app,
        "author",
        "first_name=++Frank++&family_name=Herbert&date_of_birth=1920-10-08&date_of_death=",
    )
    .await;
    assert!(url.starts_with("/catalog/author/"));

    let reply = get(&app, &url).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Author: Herbert, Frank"));
    assert!(reply.body.contains("Oct 8, 1920"));
}

#[tokio::test]
async fn whitespace_only_fields_are_rejected() {
    let app = app();
    let reply = post(
        &app,
        "/catalog/author/create",
        "first_name=+++&family_name=%09&date_of_birth=someday",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("First name must be specified."));
    assert!(reply.body.contains("Family name must be specified."));
    assert!(reply.body.contains("Invalid date of birth"));
    assert!(reply.body.contains("value=\"someday\""));

    let list = get(&app, "/catalog/authors").await;
    assert!(list.body.contains("There are no authors."));
}

#[tokio::test]
async fn update_keeps_the_identifier() {
    let app = app();
    let url = herbert(&app).await;

    let reply = post(&app, &format!("{url}/update"), "first_name=Brian&family_name=Herbert").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some(url.as_str()));

    let detail = get(&app, &url).await;
    assert!(detail.body.contains("Herbert, Brian"));
    let list = get(&app, "/catalog/authors").await;
    assert_eq!(list.body.matches(id_of(&url)).count(), 1);
    assert!(!list.body.contains("Herbert, Frank"));
}

#[tokio::test]
async fn update_form_is_prefilled() {
    let app = app();
    let url = create(
        &app,
        "author",
        "first_name=Frank&family_name=Herbert&date_of_birth=1920-10-08",
    )
    .await;

    let reply = get(&app, &format!("{url}/update")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("value=\"Frank\""));
    assert!(reply.body.contains("value=\"1920-10-08\""));
}

#[tokio::test]
async fn author_with_books_cannot_be_deleted() {
    let app = app();
    let author = herbert(&app).await;
    let book = create(
        &app,
        "book",
        &format!("title=Dune&author={}&summary=desert+planet&isbn=9780441013593", id_of(&author)),
    )
    .await;

    let reply = post(&app, &format!("{author}/delete"), "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Delete the following books"));
    assert!(reply.body.contains("Dune"));
    assert_eq!(get(&app, &author).await.status, StatusCode::OK);

    let reply = post(&app, &format!("{book}/delete"), "").await;
    assert_eq!(reply.location.as_deref(), Some("/catalog/books"));
    let reply = post(&app, &format!("{author}/delete"), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/authors"));
    assert_eq!(get(&app, &author).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn genre_and_book_deletes_are_blocked_by_dependents() {
    let app = app();
    let author = herbert(&app).await;
    let genre = create(&app, "genre", "name=Science+Fiction").await;
    let book = create(
        &app,
        "book",
        &format!(
            "title=Dune&author={}&summary=desert+planet&isbn=9780441013593&genre={}",
            id_of(&author),
            id_of(&genre)
        ),
    )
    .await;
    create(&app, "bookinstance", &format!("book={}&imprint=Ace", id_of(&book))).await;

    let reply = post(&app, &format!("{genre}/delete"), "").await;
    assert!(reply.body.contains("Delete the following books"));
    let reply = post(&app, &format!("{book}/delete"), "").await;
    assert!(reply.body.contains("Delete the following copies"));
    assert_eq!(get(&app, &book).await.status, StatusCode::OK);
    assert_eq!(get(&app, &genre).await.status, StatusCode::OK);
}

#[tokio::test]
async fn genre_selection_may_be_absent_single_or_repeated() {
    let app = app();
    let author = herbert(&app).await;
    let scifi = create(&app, "genre", "name=Science+Fiction").await;
    let epic = create(&app, "genre", "name=Epic").await;
    let base = format!("author={}&summary=desert+planet&isbn=9780441013593", id_of(&author));

    let none = create(&app, "book", &format!("title=None&{base}")).await;
    let one = create(&app, "book", &format!("title=One&{base}&genre={}", id_of(&scifi))).await;
    let many = create(
        &app,
        "book",
        &format!("title=Many&{base}&genre={}&genre={}", id_of(&epic), id_of(&scifi)),
    )
    .await;

    let none = get(&app, &none).await.body;
    assert!(!none.contains(&scifi));
    assert!(!none.contains(&epic));

    let one = get(&app, &one).await.body;
    assert!(one.contains(&scifi));
    assert!(!one.contains(&epic));

    let many = get(&app, &many).await.body;
    let epic_at = many.find(&epic).unwrap();
    let scifi_at = many.find(&scifi).unwrap();
    assert!(epic_at < scifi_at);
}

#[tokio::test]
async fn dune_is_created_and_linked() {
    let app = app();
    let author = herbert(&app).await;
    let scifi = create(&app, "genre", "name=scifi").await;

    let reply = post(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Dune&author={}&summary=desert+planet&isbn=9780441013593&genre={}",
            id_of(&author),
            id_of(&scifi)
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    let url = reply.location.unwrap();
    assert!(url.starts_with("/catalog/book/"));

    let detail = get(&app, &url).await.body;
    assert!(detail.contains("<h1>Dune</h1>"));
    assert!(detail.contains("desert planet"));
    assert!(detail.contains("9780441013593"));
    assert!(detail.contains(&author));
    assert!(detail.contains(&scifi));

    let author_page = get(&app, &author).await.body;
    assert!(author_page.contains(&url));
    let genre_page = get(&app, &scifi).await.body;
    assert!(genre_page.contains(&url));
}

#[tokio::test]
async fn book_with_unknown_author_is_rejected() {
    let app = app();
    let reply = post(
        &app,
        "/catalog/book/create",
        "title=Dune&author=00000000-0000-4000-8000-000000000000&summary=desert+planet&isbn=1",
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Author must be selected from the list."));
    assert!(reply.body.contains("value=\"Dune\""));
}

#[tokio::test]
async fn submitted_markup_is_stored_escaped() {
    let app = app();
    let url = create(&app, "genre", "name=%3Cb%3EHorror%3C%2Fb%3E").await;

    let body = get(&app, &url).await.body;
    assert!(body.contains("&lt;b&gt;Horror&lt;&#x2F;b&gt;"));
    assert!(!body.contains("<b>Horror"));
}

#[tokio::test]
async fn duplicate_genre_resolves_to_existing() {
    let app = app();
    let first = create(&app, "genre", "name=Fantasy").await;
    let second = create(&app, "genre", "name=fantasy").await;
    assert_eq!(first, second);

    let list = get(&app, "/catalog/genres").await;
    assert_eq!(list.body.matches(id_of(&first)).count(), 1);
    assert_eq!(list.body.matches("Fantasy").count(), 1);
    assert!(!list.body.contains(">fantasy<"));
}

#[tokio::test]
async fn short_genre_name_is_rejected() {
    let app = app();
    let reply = post(&app, "/catalog/genre/create", "name=SF").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name must contain at least 3 characters"));
}

#[tokio::test]
async fn copy_defaults_to_maintenance() {
    let app = app();
    let author = herbert(&app).await;
    let book = create(
        &app,
        "book",
        &format!("title=Dune&author={}&summary=desert+planet&isbn=9780441013593", id_of(&author)),
    )
    .await;

    let copy = create(&app, "bookinstance", &format!("book={}&imprint=Ace&due_back=", id_of(&book))).await;
    let detail = get(&app, &copy).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Copy: Dune"));
    assert!(detail.body.contains("Maintenance"));

    let reply = post(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Ace&status=Lost", id_of(&book)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Invalid status."));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = app();
    let absent = "00000000-0000-4000-8000-000000000000";

    for kind in ["author", "book", "bookinstance", "genre"] {
        let reply = get(&app, &format!("/catalog/{kind}/{absent}")).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{kind}");
        let reply = get(&app, &format!("/catalog/{kind}/not-an-id/update")).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{kind}");
    }
}

#[tokio::test]
async fn deleting_missing_records_redirects_to_the_list() {
    let app = app();
    let reply = get(&app, "/catalog/genre/00000000-0000-4000-8000-000000000000/delete").await;
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));

    let reply = post(&app, "/catalog/book/not-an-id/delete", "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/books"));
}

#[tokio::test]
async fn probes_report_health() {
    let app = app();

    let reply = get(&app, "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body["status"], "healthy");

    let reply = get(&app, "/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body["status"], "ready");
}
