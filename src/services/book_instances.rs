//! Book instance (copy) pages and submissions

use serde::Serialize;
use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceDraft, BookInstanceForm, BookListing, BookStatus, InstanceView},
    repository::Repository,
    validation::{Checker, FieldError},
};

#[derive(Debug, Serialize)]
pub struct InstanceListPage {
    pub title: &'static str,
    pub bookinstance_list: Vec<InstanceView>,
}

#[derive(Debug, Serialize)]
pub struct InstanceDetailPage {
    pub title: String,
    pub bookinstance: InstanceView,
}

#[derive(Debug, Serialize)]
pub struct BookOption {
    pub id: Uuid,
    pub title: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct InstanceFormPage {
    pub title: &'static str,
    pub bookinstance: BookInstanceForm,
    pub book_list: Vec<BookOption>,
    pub statuses: Vec<StatusOption>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct InstanceDeletePage {
    pub title: &'static str,
    pub bookinstance: InstanceView,
}

const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update BookInstance";

impl InstanceFormPage {
    fn new(
        title: &'static str,
        bookinstance: BookInstanceForm,
        books: &[BookListing],
        errors: Vec<FieldError>,
    ) -> Self {
        let book_list = books
            .iter()
            .map(|book| BookOption {
                id: book.id,
                title: book.title.clone(),
                selected: book.id.to_string() == bookinstance.book,
            })
            .collect();
        let current = if bookinstance.status.is_empty() {
            BookStatus::default().as_str()
        } else {
            bookinstance.status.as_str()
        };
        let statuses = BookStatus::ALL
            .iter()
            .map(|status| StatusOption {
                value: status.as_str(),
                selected: status.as_str() == current,
            })
            .collect();

        Self {
            title,
            bookinstance,
            book_list,
            statuses,
            errors,
        }
    }
}

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<InstanceListPage> {
        let instances = self.repository.book_instances.list_instances().await?;
        Ok(InstanceListPage {
            title: "Book Instance List",
            bookinstance_list: instances.iter().map(InstanceView::from).collect(),
        })
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<InstanceDetailPage> {
        let listing = self
            .repository
            .book_instances
            .find_instance_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book instance not found".to_string()))?;

        let title = match &listing.book {
            Some(book) => format!("Copy: {}", book.title),
            None => "Copy".to_string(),
        };
        Ok(InstanceDetailPage {
            title,
            bookinstance: InstanceView::from(&listing),
        })
    }

    pub async fn create_form(&self) -> AppResult<InstanceFormPage> {
        self.form_page(CREATE_TITLE, BookInstanceForm::default(), Vec::new())
            .await
    }

    pub async fn create(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstance, InstanceFormPage>> {
        let draft = match self.validate(form).await? {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!("Book instance create rejected: {} field error(s)", errors.len());
                let page = self.form_page(CREATE_TITLE, echo, errors).await?;
                return Ok(Submission::Rejected(page));
            }
        };

        let instance = draft.into_instance(Uuid::new_v4());
        self.repository
            .book_instances
            .insert_instance(&instance)
            .await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book_id);
        Ok(Submission::Accepted(instance))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<InstanceFormPage> {
        let (instance, books) = tokio::try_join!(
            self.repository.book_instances.find_instance(id),
            self.repository.books.list_books(),
        )?;
        let instance =
            instance.ok_or_else(|| AppError::NotFound("Book instance not found".to_string()))?;

        Ok(InstanceFormPage::new(
            UPDATE_TITLE,
            BookInstanceForm::from(&instance),
            &books,
            Vec::new(),
        ))
    }

    /// Replace the copy stored under `id`; the identifier never changes
    pub async fn update(
        &self,
        id: Uuid,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstance, InstanceFormPage>> {
        let draft = match self.validate(form).await? {
            Ok(draft) => draft,
            Err((echo, errors)) => {
                tracing::debug!(
                    "Book instance {} update rejected: {} field error(s)",
                    id,
                    errors.len()
                );
                let page = self.form_page(UPDATE_TITLE, echo, errors).await?;
                return Ok(Submission::Rejected(page));
            }
        };

        let instance = draft.into_instance(id);
        self.repository
            .book_instances
            .update_instance(&instance)
            .await?;
        tracing::info!("Updated book instance {}", id);
        Ok(Submission::Accepted(instance))
    }

    /// `None` when the copy does not exist
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<InstanceDeletePage>> {
        let listing = self
            .repository
            .book_instances
            .find_instance_detail(id)
            .await?;

        Ok(listing.map(|listing| InstanceDeletePage {
            title: "Delete BookInstance",
            bookinstance: InstanceView::from(&listing),
        }))
    }

    /// Copies have no dependents, so deletion is never blocked
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<InstanceDeletePage>> {
        if self
            .repository
            .book_instances
            .find_instance(id)
            .await?
            .is_none()
        {
            tracing::debug!("Book instance {} already gone", id);
            return Ok(Deletion::Removed);
        }

        self.repository.book_instances.delete_instance(id).await?;
        tracing::info!("Deleted book instance {}", id);
        Ok(Deletion::Removed)
    }

    async fn validate(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Result<BookInstanceDraft, (BookInstanceForm, Vec<FieldError>)>> {
        let draft = match form.check() {
            Ok(draft) => draft,
            Err(rejection) => return Ok(Err(rejection)),
        };

        let mut checker = Checker::new();
        if self
            .repository
            .books
            .find_book(draft.book_id)
            .await?
            .is_none()
        {
            checker.reject("book", "Book must be selected from the list.");
        }

        let echo = BookInstanceForm::from(&draft);
        Ok(checker.finish(draft).map_err(|errors| (echo, errors)))
    }

    async fn form_page(
        &self,
        title: &'static str,
        bookinstance: BookInstanceForm,
        errors: Vec<FieldError>,
    ) -> AppResult<InstanceFormPage> {
        let books = self.repository.books.list_books().await?;
        Ok(InstanceFormPage::new(title, bookinstance, &books, errors))
    }
}
