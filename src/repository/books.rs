//! Books repository for database operations.
//!
//! Genres live in `book_genres`; `position` keeps the order in which they
//! were selected so a book reads back exactly as it was submitted.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDetail, BookListing, Genre},
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.summary, b.isbn, b.author_id,
           COALESCE(
               ARRAY_AGG(bg.genre_id ORDER BY bg.position) FILTER (WHERE bg.genre_id IS NOT NULL),
               ARRAY[]::uuid[]
           ) AS genre_ids
    FROM books b
    LEFT JOIN book_genres bg ON bg.book_id = b.id
"#;

/// Case-insensitive title order, pinned to byte order so it does not depend
/// on the database collation
const TITLE_ORDER: &str = r#"LOWER(b.title) COLLATE "C", b.title COLLATE "C""#;

#[derive(sqlx::FromRow)]
struct BookListingRow {
    id: Uuid,
    title: String,
    author_id: Uuid,
    first_name: Option<String>,
    family_name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
}

impl From<BookListingRow> for BookListing {
    fn from(row: BookListingRow) -> Self {
        let author = match (row.first_name, row.family_name) {
            (Some(first_name), Some(family_name)) => Some(Author {
                id: row.author_id,
                first_name,
                family_name,
                date_of_birth: row.date_of_birth,
                date_of_death: row.date_of_death,
            }),
            _ => None,
        };
        BookListing {
            id: row.id,
            title: row.title,
            author,
        }
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert_genres(tx: &mut Transaction<'_, Postgres>, book: &Book) -> AppResult<()> {
        for (position, genre_id) in book.genre_ids.iter().enumerate() {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id, position) VALUES ($1, $2, $3)")
                .bind(book.id)
                .bind(genre_id)
                .bind(position as i32)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list_books(&self) -> AppResult<Vec<BookListing>> {
        let rows = sqlx::query_as::<_, BookListingRow>(
            r#"
            SELECT b.id, b.title, b.author_id,
                   a.first_name, a.family_name, a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY LOWER(b.title) COLLATE "C", b.title COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookListing::from).collect())
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.id = $1 GROUP BY b.id", BOOK_SELECT);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_book_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let Some(book) = self.find_book(id).await? else {
            return Ok(None);
        };

        let author_query = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(book.author_id)
            .fetch_optional(&self.pool);
        let genres_query = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY bg.position
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool);
        let (author, genres) = tokio::try_join!(author_query, genres_query)?;

        Ok(Some(BookDetail {
            book,
            author,
            genres,
        }))
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let query = format!(
            "{} WHERE b.author_id = $1 GROUP BY b.id ORDER BY {}",
            BOOK_SELECT, TITLE_ORDER
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let query = format!(
            "{} WHERE b.id IN (SELECT book_id FROM book_genres WHERE genre_id = $1) \
             GROUP BY b.id ORDER BY {}",
            BOOK_SELECT, TITLE_ORDER
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_books(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_book(&self, book: &Book) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO books (id, title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .execute(&mut *tx)
        .await?;
        Self::insert_genres(&mut tx, book).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_book(&self, book: &Book) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, summary = $3, isbn = $4, author_id = $5
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_genres(&mut tx, book).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
