//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorForm, AuthorView};
pub use book::{Book, BookDetail, BookDraft, BookForm, BookListing, BookRef, BookView};
pub use book_instance::{
    BookInstance, BookInstanceDraft, BookInstanceForm, BookStatus, InstanceListing, InstanceView,
};
pub use genre::{Genre, GenreDraft, GenreForm, GenreView};

/// Medium human format, e.g. `Oct 14, 1983`. Empty when absent.
pub fn format_date_med(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `yyyy-MM-dd`, as expected by `<input type="date">`. Empty when absent.
pub fn format_date_iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
