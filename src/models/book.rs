//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{author::AuthorView, genre::GenreView, Author, Genre};
use crate::validation::{sanitize_each, Checker, FieldError};

/// Full book model from the store. `genre_ids` keeps submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub genre_ids: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        url(self.id)
    }
}

pub fn url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Book reference as shown next to a copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookRef {
    pub id: Uuid,
    pub title: String,
}

/// Book row for the list page, author populated
#[derive(Debug, Clone)]
pub struct BookListing {
    pub id: Uuid,
    pub title: String,
    pub author: Option<Author>,
}

/// Book with author and genres populated
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            url: book.url(),
            book: book.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookRefView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

impl From<&BookRef> for BookRefView {
    fn from(book: &BookRef) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            url: url(book.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookListingView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub author: Option<AuthorView>,
}

impl From<&BookListing> for BookListingView {
    fn from(listing: &BookListing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            url: url(listing.id),
            author: listing.author.as_ref().map(AuthorView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDetailView {
    #[serde(flatten)]
    pub book: BookView,
    pub author: Option<AuthorView>,
    pub genres: Vec<GenreView>,
}

impl From<&BookDetail> for BookDetailView {
    fn from(detail: &BookDetail) -> Self {
        Self {
            book: BookView::from(&detail.book),
            author: detail.author.as_ref().map(AuthorView::from),
            genres: detail.genres.iter().map(GenreView::from).collect(),
        }
    }
}

/// Book form as submitted. `genre` may arrive zero, one or many times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub genre_ids: Vec<Uuid>,
}

impl BookForm {
    pub fn check(&self) -> Result<BookDraft, (BookForm, Vec<FieldError>)> {
        let mut checker = Checker::new();

        let title = checker
            .field("title", &self.title)
            .trim()
            .required("Title must not be empty.")
            .escape()
            .value();
        let (author, author_id) = checker
            .field("author", &self.author)
            .trim()
            .required("Author must not be empty.")
            .escape()
            .id("Author must be selected from the list.");
        let summary = checker
            .field("summary", &self.summary)
            .trim()
            .required("Summary must not be empty.")
            .escape()
            .value();
        let isbn = checker
            .field("isbn", &self.isbn)
            .trim()
            .required("ISBN must not be empty.")
            .escape()
            .value();
        let genre = sanitize_each(&self.genre);

        let genre_ids: Vec<Uuid> = genre.iter().filter_map(|g| Uuid::parse_str(g).ok()).collect();
        if genre_ids.len() != genre.len() {
            checker.reject("genre", "Invalid genre selection.");
        }

        let echo = BookForm {
            title: title.clone(),
            author,
            summary: summary.clone(),
            isbn: isbn.clone(),
            genre,
        };
        match author_id {
            Some(author_id) if checker.is_clean() => Ok(BookDraft {
                title,
                summary,
                isbn,
                author_id,
                genre_ids,
            }),
            _ => Err((echo, checker.into_errors())),
        }
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_ids.iter().map(Uuid::to_string).collect(),
        }
    }
}

impl From<&BookDraft> for BookForm {
    fn from(draft: &BookDraft) -> Self {
        Self {
            title: draft.title.clone(),
            author: draft.author_id.to_string(),
            summary: draft.summary.clone(),
            isbn: draft.isbn.clone(),
            genre: draft.genre_ids.iter().map(Uuid::to_string).collect(),
        }
    }
}

impl BookDraft {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            summary: self.summary,
            isbn: self.isbn,
            author_id: self.author_id,
            genre_ids: self.genre_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune(genre: Vec<String>) -> BookForm {
        BookForm {
            title: "Dune".into(),
            author: Uuid::new_v4().to_string(),
            summary: "desert planet".into(),
            isbn: "9780441013593".into(),
            genre,
        }
    }

    #[test]
    fn genre_selection_keeps_its_shape() {
        let one = Uuid::new_v4();
        let two = Uuid::new_v4();

        assert!(dune(vec![]).check().unwrap().genre_ids.is_empty());
        assert_eq!(dune(vec![one.to_string()]).check().unwrap().genre_ids, vec![one]);
        assert_eq!(
            dune(vec![two.to_string(), one.to_string()])
                .check()
                .unwrap()
                .genre_ids,
            vec![two, one]
        );
    }

    #[test]
    fn bad_references_are_field_errors() {
        let mut form = dune(vec!["scifi".into()]);
        form.author = "nobody".into();

        let (echo, errors) = form.check().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["author", "genre"]);
        assert_eq!(echo.author, "nobody");
        assert_eq!(echo.genre, vec!["scifi"]);
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let form = BookForm {
            title: " ".into(),
            summary: "\n".into(),
            ..Default::default()
        };
        let (_, errors) = form.check().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "author", "summary", "isbn"]);
    }

    #[test]
    fn draft_round_trips_into_form() {
        let draft = dune(vec![]).check().unwrap();
        let book = draft.clone().into_book(Uuid::new_v4());
        assert_eq!(BookForm::from(&draft).author, book.author_id.to_string());
        assert_eq!(book.url(), format!("/catalog/book/{}", book.id));
    }
}
