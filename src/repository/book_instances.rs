//! Book instances repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookInstanceStore;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookRef, BookStatus, InstanceListing},
};

#[derive(sqlx::FromRow)]
struct InstanceListingRow {
    id: Uuid,
    book_id: Uuid,
    imprint: String,
    status: BookStatus,
    due_back: Option<NaiveDate>,
    book_title: Option<String>,
}

impl From<InstanceListingRow> for InstanceListing {
    fn from(row: InstanceListingRow) -> Self {
        InstanceListing {
            book: row.book_title.map(|title| BookRef {
                id: row.book_id,
                title,
            }),
            instance: BookInstance {
                id: row.id,
                book_id: row.book_id,
                imprint: row.imprint,
                status: row.status,
                due_back: row.due_back,
            },
        }
    }
}

const LISTING_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list_instances(&self) -> AppResult<Vec<InstanceListing>> {
        let query = format!(
            r#"{} ORDER BY LOWER(b.title) COLLATE "C", b.title COLLATE "C",
                   LOWER(bi.imprint) COLLATE "C", bi.imprint COLLATE "C""#,
            LISTING_SELECT
        );
        let rows = sqlx::query_as::<_, InstanceListingRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InstanceListing::from).collect())
    }

    async fn find_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_instance_detail(&self, id: Uuid) -> AppResult<Option<InstanceListing>> {
        let query = format!("{} WHERE bi.id = $1", LISTING_SELECT);
        let row = sqlx::query_as::<_, InstanceListingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(InstanceListing::from))
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(
            r#"SELECT * FROM book_instances WHERE book_id = $1
               ORDER BY LOWER(imprint) COLLATE "C", imprint COLLATE "C""#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_instances(&self, status: Option<BookStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE $1::book_status IS NULL OR status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn insert_instance(&self, instance: &BookInstance) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(instance.id)
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status)
        .bind(instance.due_back)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_instance(&self, instance: &BookInstance) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            "#,
        )
        .bind(instance.id)
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status)
        .bind(instance.due_back)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", instance.id)));
        }
        Ok(())
    }

    async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
