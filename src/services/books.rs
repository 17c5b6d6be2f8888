//! Book pages and submissions

use serde::Serialize;
use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDetailView, BookListingView},
        Author, Book, BookDraft, BookForm, BookView, Genre, InstanceView,
    },
    repository::Repository,
    validation::{Checker, FieldError},
};

#[derive(Debug, Serialize)]
pub struct BookListPage {
    pub title: &'static str,
    pub book_list: Vec<BookListingView>,
}

#[derive(Debug, Serialize)]
pub struct BookDetailPage {
    pub title: String,
    pub book: BookDetailView,
    pub book_instances: Vec<InstanceView>,
}

/// Entry in the author drop-down
#[derive(Debug, Serialize)]
pub struct AuthorOption {
    pub id: Uuid,
    pub name: String,
    pub selected: bool,
}

/// Entry in the genre check-box list
#[derive(Debug, Serialize)]
pub struct GenreOption {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct BookFormPage {
    pub title: &'static str,
    pub book: BookForm,
    pub authors: Vec<AuthorOption>,
    pub genres: Vec<GenreOption>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct BookDeletePage {
    pub title: &'static str,
    pub book: BookView,
    pub book_instances: Vec<InstanceView>,
}

const CREATE_TITLE: &str = "Create Book";
const UPDATE_TITLE: &str = "Update Book";

impl BookFormPage {
    /// Build the form, marking the author and genres `book` refers to
    fn new(
        title: &'static str,
        book: BookForm,
        authors: &[Author],
        genres: &[Genre],
        errors: Vec<FieldError>,
    ) -> Self {
        let authors = authors
            .iter()
            .map(|author| AuthorOption {
                id: author.id,
                name: author.name(),
                selected: author.id.to_string() == book.author,
            })
            .collect();
        let genres = genres
            .iter()
            .map(|genre| GenreOption {
                id: genre.id,
                name: genre.name.clone(),
                checked: book.genre.contains(&genre.id.to_string()),
            })
            .collect();

        Self {
            title,
            book,
            authors,
            genres,
            errors,
        }
    }
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<BookListPage> {
        let books = self.repository.books.list_books().await?;
        Ok(BookListPage {
            title: "Book List",
            book_list: books.iter().map(BookListingView::from).collect(),
        })
    }

    /// Book with author and genres populated, plus its copies
    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetailPage> {
        let (book, instances) = tokio::try_join!(
            self.repository.books.find_book_detail(id),
            self.repository.book_instances.instances_by_book(id),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        Ok(BookDetailPage {
            title: book.book.title.clone(),
            book: BookDetailView::from(&book),
            book_instances: instances.iter().map(InstanceView::from).collect(),
        })
    }

    pub async fn create_form(&self) -> AppResult<BookFormPage> {
        self.form_page(CREATE_TITLE, BookForm::default(), Vec::new())
            .await
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<Book, BookFormPage>> {
        let draft = match self.validate(form).await? {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Book create rejected: {} field error(s)", errors.len());
                let page = self.form_page(CREATE_TITLE, echo, errors).await?;
                return Ok(Submission::Rejected(page));
            }
        };

        let book = draft.into_book(Uuid::new_v4());
        self.repository.books.insert_book(&book).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(Submission::Accepted(book))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookFormPage> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books.find_book(id),
            self.repository.authors.list_authors(),
            self.repository.genres.list_genres(),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        Ok(BookFormPage::new(
            UPDATE_TITLE,
            BookForm::from(&book),
            &authors,
            &genres,
            Vec::new(),
        ))
    }

    /// Replace the book stored under `id`; the identifier never changes
    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<Submission<Book, BookFormPage>> {
        let draft = match self.validate(form).await? {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Book {} update rejected: {} field error(s)", id, errors.len());
                let page = self.form_page(UPDATE_TITLE, echo, errors).await?;
                return Ok(Submission::Rejected(page));
            }
        };

        let book = draft.into_book(id);
        self.repository.books.update_book(&book).await?;
        tracing::info!("Updated book {}", id);
        Ok(Submission::Accepted(book))
    }

    /// `None` when the book does not exist
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookDeletePage>> {
        let (book, instances) = tokio::try_join!(
            self.repository.books.find_book(id),
            self.repository.book_instances.instances_by_book(id),
        )?;

        Ok(book.map(|book| BookDeletePage {
            title: "Delete Book",
            book: BookView::from(&book),
            book_instances: instances.iter().map(InstanceView::from).collect(),
        }))
    }

    /// Delete the book unless copies of it still exist
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<BookDeletePage>> {
        let Some(page) = self.delete_form(id).await? else {
            tracing::debug!("Book {} already gone", id);
            return Ok(Deletion::Removed);
        };
        if !page.book_instances.is_empty() {
            tracing::info!(
                "Refusing to delete book {}: {} copies reference it",
                id,
                page.book_instances.len()
            );
            return Ok(Deletion::Blocked(page));
        }

        self.repository.books.delete_book(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(Deletion::Removed)
    }

    /// Field rules, then a check that the author and every genre exist
    async fn validate(
        &self,
        form: BookForm,
    ) -> AppResult<Result<BookDraft, (BookForm, Vec<FieldError>)>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err(rejection) => return Ok(Err(rejection)),
        };

        let (author, genres) = tokio::try_join!(
            self.repository.authors.find_author(draft.author_id),
            self.repository.genres.list_genres(),
        )?;
        let mut checker = Checker::new();
        if author.is_none() {
            checker.reject("author", "Author must be selected from the list.");
        }
        if !draft
            .genre_ids
            .iter()
            .all(|id| genres.iter().any(|genre| genre.id == *id))
        {
            checker.reject("genre", "Invalid genre selection.");
        }

        let echo = BookForm::from(&draft);
        Ok(checker.finish(draft).map_err(|errors| (echo, errors)))
    }

    /// Fetch the selection lists and build the form around `book`
    async fn form_page(
        &self,
        title: &'static str,
        book: BookForm,
        errors: Vec<FieldError>,
    ) -> AppResult<BookFormPage> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.list_authors(),
            self.repository.genres.list_genres(),
        )?;
        Ok(BookFormPage::new(title, book, &authors, &genres, errors))
    }
}
