//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{Checker, FieldError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            url: genre.url(),
            genre: genre.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDraft {
    pub name: String,
}

impl GenreForm {
    pub fn check(&self) -> Result<GenreDraft, (GenreForm, Vec<FieldError>)> {
        let mut checker = Checker::new();
        let name = checker
            .field("name", &self.name)
            .trim()
            .min_length(3, "Genre name must contain at least 3 characters")
            .max_length(100, "Genre name must be at most 100 characters")
            .escape()
            .value();

        let echo = GenreForm { name: name.clone() };
        checker
            .finish(GenreDraft { name })
            .map_err(|errors| (echo, errors))
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

impl GenreDraft {
    pub fn into_genre(self, id: Uuid) -> Genre {
        Genre { id, name: self.name }
    }
}
