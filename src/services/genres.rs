//! Genre pages and submissions

use serde::Serialize;
use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{BookView, Genre, GenreForm, GenreView},
    repository::Repository,
    validation::FieldError,
};

#[derive(Debug, Serialize)]
pub struct GenreListPage {
    pub title: &'static str,
    pub genre_list: Vec<GenreView>,
}

#[derive(Debug, Serialize)]
pub struct GenreDetailPage {
    pub title: &'static str,
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

#[derive(Debug, Serialize)]
pub struct GenreFormPage {
    pub title: &'static str,
    pub genre: GenreForm,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct GenreDeletePage {
    pub title: &'static str,
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

const CREATE_TITLE: &str = "Create Genre";
const UPDATE_TITLE: &str = "Update Genre";

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<GenreListPage> {
        let genres = self.repository.genres.list_genres().await?;
        Ok(GenreListPage {
            title: "Genre List",
            genre_list: genres.iter().map(GenreView::from).collect(),
        })
    }

    /// Genre with the books tagged with it
    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetailPage> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_genre(id),
            self.repository.books.books_by_genre(id),
        )?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

        Ok(GenreDetailPage {
            title: "Genre Detail",
            genre: GenreView::from(&genre),
            genre_books: books.iter().map(BookView::from).collect(),
        })
    }

    pub fn create_form(&self) -> GenreFormPage {
        GenreFormPage {
            title: CREATE_TITLE,
            genre: GenreForm::default(),
            errors: Vec::new(),
        }
    }

    /// Create a genre. A name that already exists (ignoring case) resolves to
    /// the existing genre instead of a duplicate.
    pub async fn create(&self, form: GenreForm) -> AppResult<Submission<Genre, GenreFormPage>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Genre create rejected: {} field error(s)", errors.len());
                return Ok(Submission::Rejected(GenreFormPage {
                    title: CREATE_TITLE,
                    genre: echo,
                    errors,
                }));
            }
        };

        if let Some(existing) = self.repository.genres.find_genre_by_name(&draft.name).await? {
            tracing::debug!("Genre {} already exists as {}", draft.name, existing.id);
            return Ok(Submission::Accepted(existing));
        }

        let genre = draft.into_genre(Uuid::new_v4());
        self.repository.genres.insert_genre(&genre).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(Submission::Accepted(genre))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<GenreFormPage> {
        let genre = self
            .repository
            .genres
            .find_genre(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

        Ok(GenreFormPage {
            title: UPDATE_TITLE,
            genre: GenreForm::from(&genre),
            errors: Vec::new(),
        })
    }

    /// Rename the genre stored under `id`; renaming onto another genre's
    /// name is rejected
    pub async fn update(
        &self,
        id: Uuid,
        form: GenreForm,
    ) -> AppResult<Submission<Genre, GenreFormPage>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Genre {} update rejected: {} field error(s)", id, errors.len());
                return Ok(Submission::Rejected(GenreFormPage {
                    title: UPDATE_TITLE,
                    genre: echo,
                    errors,
                }));
            }
        };

        if let Some(existing) = self.repository.genres.find_genre_by_name(&draft.name).await? {
            if existing.id != id {
                return Ok(Submission::Rejected(GenreFormPage {
                    title: UPDATE_TITLE,
                    genre: GenreForm { name: draft.name },
                    errors: vec![FieldError {
                        field: "name",
                        message: "A genre with this name already exists".to_string(),
                    }],
                }));
            }
        }

        let genre = draft.into_genre(id);
        self.repository.genres.update_genre(&genre).await?;
        tracing::info!("Updated genre {}", id);
        Ok(Submission::Accepted(genre))
    }

    /// `None` when the genre does not exist
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<GenreDeletePage>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_genre(id),
            self.repository.books.books_by_genre(id),
        )?;

        Ok(genre.map(|genre| GenreDeletePage {
            title: "Delete Genre",
            genre: GenreView::from(&genre),
            genre_books: books.iter().map(BookView::from).collect(),
        }))
    }

    /// Delete the genre unless books are still tagged with it
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<GenreDeletePage>> {
        let Some(page) = self.delete_form(id).await? else {
            tracing::debug!("Genre {} already gone", id);
            return Ok(Deletion::Removed);
        };
        if !page.genre_books.is_empty() {
            tracing::info!(
                "Refusing to delete genre {}: {} book(s) reference it",
                id,
                page.genre_books.len()
            );
            return Ok(Deletion::Blocked(page));
        }

        self.repository.genres.delete_genre(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(Deletion::Removed)
    }
}
