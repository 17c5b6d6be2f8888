//! Author pages and submissions

use serde::Serialize;
use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{book::BookView, Author, AuthorForm, AuthorView},
    repository::Repository,
    validation::FieldError,
};

#[derive(Debug, Serialize)]
pub struct AuthorListPage {
    pub title: &'static str,
    pub author_list: Vec<AuthorView>,
}

#[derive(Debug, Serialize)]
pub struct AuthorDetailPage {
    pub title: &'static str,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

#[derive(Debug, Serialize)]
pub struct AuthorFormPage {
    pub title: &'static str,
    pub author: AuthorForm,
    pub errors: Vec<FieldError>,
}

/// Confirmation page; `author_books` are the dependents blocking deletion
#[derive(Debug, Serialize)]
pub struct AuthorDeletePage {
    pub title: &'static str,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

const CREATE_TITLE: &str = "Create Author";
const UPDATE_TITLE: &str = "Update Author";

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<AuthorListPage> {
        let authors = self.repository.authors.list_authors().await?;
        Ok(AuthorListPage {
            title: "Author List",
            author_list: authors.iter().map(AuthorView::from).collect(),
        })
    }

    /// Author with the books they wrote
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetailPage> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_author(id),
            self.repository.books.books_by_author(id),
        )?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

        Ok(AuthorDetailPage {
            title: "Author Detail",
            author: AuthorView::from(&author),
            author_books: books.iter().map(BookView::from).collect(),
        })
    }

    pub fn create_form(&self) -> AuthorFormPage {
        AuthorFormPage {
            title: CREATE_TITLE,
            author: AuthorForm::default(),
            errors: Vec::new(),
        }
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<Submission<Author, AuthorFormPage>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Author create rejected: {} field error(s)", errors.len());
                return Ok(Submission::Rejected(AuthorFormPage {
                    title: CREATE_TITLE,
                    author: echo,
                    errors,
                }));
            }
        };

        let author = draft.into_author(Uuid::new_v4());
        self.repository.authors.insert_author(&author).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(Submission::Accepted(author))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<AuthorFormPage> {
        let author = self
            .repository
            .authors
            .find_author(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

        Ok(AuthorFormPage {
            title: UPDATE_TITLE,
            author: AuthorForm::from(&author),
            errors: Vec::new(),
        })
    }

    /// Replace the author stored under `id`; the identifier never changes
    pub async fn update(
        &self,
        id: Uuid,
        form: AuthorForm,
    ) -> AppResult<Submission<Author, AuthorFormPage>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Author {} update rejected: {} field error(s)", id, errors.len());
                return Ok(Submission::Rejected(AuthorFormPage {
                    title: UPDATE_TITLE,
                    author: echo,
                    errors,
                }));
            }
        };

        let author = draft.into_author(id);
        self.repository.authors.update_author(&author).await?;
        tracing::info!("Updated author {}", id);
        Ok(Submission::Accepted(author))
    }

    /// `None` when the author does not exist
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<AuthorDeletePage>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_author(id),
            self.repository.books.books_by_author(id),
        )?;

        Ok(author.map(|author| AuthorDeletePage {
            title: "Delete Author",
            author: AuthorView::from(&author),
            author_books: books.iter().map(BookView::from).collect(),
        }))
    }

    /// Delete the author unless books still reference them
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<AuthorDeletePage>> {
        let Some(page) = self.delete_form(id).await? else {
            tracing::debug!("Author {} already gone", id);
            return Ok(Deletion::Removed);
        };
        if !page.author_books.is_empty() {
            tracing::info!(
                "Refusing to delete author {}: {} book(s) reference it",
                id,
                page.author_books.len()
            );
            return Ok(Deletion::Blocked(page));
        }

        self.repository.authors.delete_author(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(Deletion::Removed)
    }
}
