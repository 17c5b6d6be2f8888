//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{
    book::{BookRef, BookRefView},
    format_date_iso, format_date_med,
};
use crate::validation::{Checker, FieldError};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_status")]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Maintenance,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// Full book instance model from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Copy with its book populated
#[derive(Debug, Clone)]
pub struct InstanceListing {
    pub instance: BookInstance,
    pub book: Option<BookRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
    pub due_back_iso: String,
    pub book: Option<BookRefView>,
}

impl From<&BookInstance> for InstanceView {
    fn from(instance: &BookInstance) -> Self {
        Self {
            url: instance.url(),
            due_back_formatted: format_date_med(instance.due_back),
            due_back_iso: format_date_iso(instance.due_back),
            book: None,
            instance: instance.clone(),
        }
    }
}

impl From<&InstanceListing> for InstanceView {
    fn from(listing: &InstanceListing) -> Self {
        Self {
            book: listing.book.as_ref().map(BookRefView::from),
            ..InstanceView::from(&listing.instance)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub due_back: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceForm {
    pub fn check(&self) -> Result<BookInstanceDraft, (BookInstanceForm, Vec<FieldError>)> {
        let mut checker = Checker::new();
        let statuses = BookStatus::ALL.map(|s| s.as_str());

        let (book, book_id) = checker
            .field("book", &self.book)
            .trim()
            .required("Book must be specified.")
            .escape()
            .id("Book must be selected from the list.");
        let imprint = checker
            .field("imprint", &self.imprint)
            .trim()
            .required("Imprint must be specified.")
            .escape()
            .value();
        let mut status = checker
            .field("status", &self.status)
            .trim()
            .optional()
            .escape()
            .one_of(&statuses, "Invalid status.")
            .value();
        if status.is_empty() {
            status = BookStatus::default().to_string();
        }
        let (due_back_echo, due_back) = checker
            .field("due_back", &self.due_back)
            .trim()
            .optional()
            .escape()
            .date("Invalid date");

        let parsed_status = status.parse::<BookStatus>().ok();
        let echo = BookInstanceForm {
            book,
            imprint: imprint.clone(),
            status,
            due_back: due_back_echo,
        };
        match (book_id, parsed_status) {
            (Some(book_id), Some(status)) if checker.is_clean() => Ok(BookInstanceDraft {
                book_id,
                imprint,
                status,
                due_back,
            }),
            _ => Err((echo, checker.into_errors())),
        }
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book_id.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: format_date_iso(instance.due_back),
        }
    }
}

impl From<&BookInstanceDraft> for BookInstanceForm {
    fn from(draft: &BookInstanceDraft) -> Self {
        Self {
            book: draft.book_id.to_string(),
            imprint: draft.imprint.clone(),
            status: draft.status.to_string(),
            due_back: format_date_iso(draft.due_back),
        }
    }
}

impl BookInstanceDraft {
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book_id: self.book_id,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}
