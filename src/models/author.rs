//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_date_iso, format_date_med};
use crate::validation::{Checker, FieldError};

const NAME_MAX: usize = 100;

/// Full author model from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// `"Family, First"`, or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        url(self.id)
    }
}

pub fn url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

/// Author plus the derived fields templates display
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub date_of_birth_iso: String,
    pub date_of_death_iso: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name(),
            url: author.url(),
            date_of_birth_formatted: format_date_med(author.date_of_birth),
            date_of_death_formatted: format_date_med(author.date_of_death),
            date_of_birth_iso: format_date_iso(author.date_of_birth),
            date_of_death_iso: format_date_iso(author.date_of_death),
            author: author.clone(),
        }
    }
}

/// Author form as submitted (and echoed back on rejection)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

/// Sanitized author, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorForm {
    /// Run the author field rules. On failure the sanitized echo comes back
    /// alongside the errors.
    pub fn check(&self) -> Result<AuthorDraft, (AuthorForm, Vec<FieldError>)> {
        let mut checker = Checker::new();

        let first_name = checker
            .field("first_name", &self.first_name)
            .trim()
            .required("First name must be specified.")
            .max_length(NAME_MAX, "First name must be at most 100 characters.")
            .escape()
            .alphanumeric("First name has non-alphanumeric characters.")
            .value();
        let family_name = checker
            .field("family_name", &self.family_name)
            .trim()
            .required("Family name must be specified.")
            .max_length(NAME_MAX, "Family name must be at most 100 characters.")
            .escape()
            .alphanumeric("Family name has non-alphanumeric characters.")
            .value();
        let (birth_echo, date_of_birth) = checker
            .field("date_of_birth", &self.date_of_birth)
            .trim()
            .optional()
            .escape()
            .date("Invalid date of birth");
        let (death_echo, date_of_death) = checker
            .field("date_of_death", &self.date_of_death)
            .trim()
            .optional()
            .escape()
            .date("Invalid date of death");

        let echo = AuthorForm {
            first_name: first_name.clone(),
            family_name: family_name.clone(),
            date_of_birth: birth_echo,
            date_of_death: death_echo,
        };
        checker
            .finish(AuthorDraft {
                first_name,
                family_name,
                date_of_birth,
                date_of_death,
            })
            .map_err(|errors| (echo, errors))
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: format_date_iso(author.date_of_birth),
            date_of_death: format_date_iso(author.date_of_death),
        }
    }
}

impl AuthorDraft {
    /// Attach an identifier: a fresh one on create, the existing one on update
    pub fn into_author(self, id: Uuid) -> Author {
        Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }
}
