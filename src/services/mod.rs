//! Business logic services.
//!
//! Every service method builds the data bag for one page. Independent store
//! reads are joined with `tokio::try_join!`, so the first failing read aborts
//! the whole page and nothing is rendered from partial results.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::repository::Repository;

/// Outcome of a create or update submission
#[derive(Debug)]
pub enum Submission<T, P> {
    /// Input accepted; carries the record to redirect to
    Accepted(T),
    /// Input rejected; carries the form page to render again
    Rejected(P),
}

/// Outcome of a delete submission
#[derive(Debug)]
pub enum Deletion<P> {
    /// The record is gone (deleted now, or already absent)
    Removed,
    /// Dependents still reference the record; carries the confirmation page
    Blocked(P),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub genres: genres::GenresService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            genres: genres::GenresService::new(repository),
        }
    }
}
