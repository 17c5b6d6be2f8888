//! Home page summary

use serde::Serialize;

use crate::{error::AppResult, models::BookStatus, repository::Repository};

/// Record counts shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub title: &'static str,
    pub data: Option<CatalogCounts>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (books, instances, available, authors, genres) = tokio::try_join!(
            self.repository.books.count_books(),
            self.repository.book_instances.count_instances(None),
            self.repository
                .book_instances
                .count_instances(Some(BookStatus::Available)),
            self.repository.authors.count_authors(),
            self.repository.genres.count_genres(),
        )?;

        Ok(CatalogCounts {
            book_count: books,
            book_instance_count: instances,
            book_instance_available_count: available,
            author_count: authors,
            genre_count: genres,
        })
    }

    /// The home page degrades to an error notice instead of failing
    pub async fn index(&self) -> IndexPage {
        match self.counts().await {
            Ok(counts) => IndexPage {
                title: "Local Library Home",
                data: Some(counts),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Failed to count catalog records: {}", e);
                IndexPage {
                    title: "Local Library Home",
                    data: None,
                    error: Some("Catalog counts are unavailable right now.".to_string()),
                }
            }
        }
    }
}
