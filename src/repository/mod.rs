//! Repository layer: the record store behind the catalog.
//!
//! Each record kind has its own store trait. Sorting and reference
//! population are folded into the named queries (`list_books` comes back
//! sorted by title with authors populated, and so on), so callers never
//! assemble joins themselves. Two backends implement every trait:
//! PostgreSQL through sqlx, and [`memory::MemoryStore`] for development
//! and tests.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookDetail, BookInstance, BookListing, BookStatus, Genre, InstanceListing,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors sorted by family name, then first name
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn count_authors(&self) -> AppResult<i64>;
    async fn insert_author(&self, author: &Author) -> AppResult<()>;
    /// Replace the author stored under `author.id`
    async fn update_author(&self, author: &Author) -> AppResult<()>;
    async fn delete_author(&self, id: Uuid) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres sorted by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn find_genre(&self, id: Uuid) -> AppResult<Option<Genre>>;
    /// Case-insensitive lookup by name
    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn count_genres(&self) -> AppResult<i64>;
    async fn insert_genre(&self, genre: &Genre) -> AppResult<()>;
    async fn update_genre(&self, genre: &Genre) -> AppResult<()>;
    async fn delete_genre(&self, id: Uuid) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books sorted by title, authors populated
    async fn list_books(&self) -> AppResult<Vec<BookListing>>;
    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>>;
    /// One book with its author and genres populated
    async fn find_book_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>>;
    /// Books written by `author_id`, sorted by title
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    /// Books tagged with `genre_id`, sorted by title
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    async fn count_books(&self) -> AppResult<i64>;
    async fn insert_book(&self, book: &Book) -> AppResult<()>;
    async fn update_book(&self, book: &Book) -> AppResult<()>;
    async fn delete_book(&self, id: Uuid) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All copies sorted by book title then imprint, books populated
    async fn list_instances(&self) -> AppResult<Vec<InstanceListing>>;
    async fn find_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    /// One copy with its book populated
    async fn find_instance_detail(&self, id: Uuid) -> AppResult<Option<InstanceListing>>;
    /// Copies of `book_id`
    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    /// Count copies, optionally only those in `status`
    async fn count_instances(&self, status: Option<BookStatus>) -> AppResult<i64>;
    async fn insert_instance(&self, instance: &BookInstance) -> AppResult<()>;
    async fn update_instance(&self, instance: &BookInstance) -> AppResult<()>;
    async fn delete_instance(&self, id: Uuid) -> AppResult<()>;
}

/// Main repository struct holding one handle per record kind
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by a fresh, empty in-memory store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            authors: Arc::new(store.clone()),
            genres: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            book_instances: Arc::new(store),
            pool: None,
        }
    }

    /// Assemble a repository from arbitrary store handles
    pub fn from_stores(
        authors: Arc<dyn AuthorStore>,
        genres: Arc<dyn GenreStore>,
        books: Arc<dyn BookStore>,
        book_instances: Arc<dyn BookInstanceStore>,
    ) -> Self {
        Self {
            authors,
            genres,
            books,
            book_instances,
            pool: None,
        }
    }

    /// Check the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
