//! Book copies repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, CopyDetails, CopyRow, CreateCopy, LoanStatus, UpdateCopy},
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List copies ordered by due date, optionally filtered by status
    pub async fn list(&self, status: Option<LoanStatus>, today: NaiveDate) -> AppResult<Vec<CopyDetails>> {
        let rows = if let Some(status) = status {
            sqlx::query_as::<_, CopyRow>(
                r#"
                SELECT c.id, c.book_id, b.title AS book_title, c.imprint,
                       c.due_back, c.status, c.borrower_id
                FROM copies c
                LEFT JOIN books b ON c.book_id = b.id
                WHERE c.status = $1
                ORDER BY c.due_back
                "#,
            )
            .bind(status)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CopyRow>(
                r#"
                SELECT c.id, c.book_id, b.title AS book_title, c.imprint,
                       c.due_back, c.status, c.borrower_id
                FROM copies c
                LEFT JOIN books b ON c.book_id = b.id
                ORDER BY c.due_back
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows.into_iter().map(|row| row.into_details(today)).collect())
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "SELECT id, book_id, imprint, due_back, status, borrower_id FROM copies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Get copy with its book title and overdue flag
    pub async fn get_details(&self, id: Uuid, today: NaiveDate) -> AppResult<CopyDetails> {
        let row = sqlx::query_as::<_, CopyRow>(
            r#"
            SELECT c.id, c.book_id, b.title AS book_title, c.imprint,
                   c.due_back, c.status, c.borrower_id
            FROM copies c
            LEFT JOIN books b ON c.book_id = b.id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))?;

        Ok(row.into_details(today))
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn on_loan_to(&self, borrower_id: i32, today: NaiveDate) -> AppResult<Vec<CopyDetails>> {
        let rows = sqlx::query_as::<_, CopyRow>(
            r#"
            SELECT c.id, c.book_id, b.title AS book_title, c.imprint,
                   c.due_back, c.status, c.borrower_id
            FROM copies c
            LEFT JOIN books b ON c.book_id = b.id
            WHERE c.status = $1 AND c.borrower_id = $2
            ORDER BY c.due_back
            "#,
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_details(today)).collect())
    }

    /// All copies on loan, soonest due first
    pub async fn all_on_loan(&self, today: NaiveDate) -> AppResult<Vec<CopyDetails>> {
        let rows = sqlx::query_as::<_, CopyRow>(
            r#"
            SELECT c.id, c.book_id, b.title AS book_title, c.imprint,
                   c.due_back, c.status, c.borrower_id
            FROM copies c
            LEFT JOIN books b ON c.book_id = b.id
            WHERE c.status = $1
            ORDER BY c.due_back
            "#,
        )
        .bind(LoanStatus::OnLoan)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_details(today)).collect())
    }

    /// Create a new copy
    pub async fn create(&self, copy: &CreateCopy) -> AppResult<BookCopy> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO copies (id, book_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(copy.book_id)
        .bind(&copy.imprint)
        .bind(copy.due_back)
        .bind(copy.status.unwrap_or_default())
        .bind(copy.borrower_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing copy
    pub async fn update(&self, id: Uuid, copy: &UpdateCopy) -> AppResult<BookCopy> {
        let mut sets = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(copy.book_id, "book_id");
        add_field!(copy.imprint, "imprint");
        add_field!(copy.due_back, "due_back");
        add_field!(copy.status, "status");
        add_field!(copy.borrower_id, "borrower_id");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE copies SET {} WHERE id = ${}",
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(copy.book_id);
        bind_field!(copy.imprint);
        bind_field!(copy.due_back);
        bind_field!(copy.status);
        bind_field!(copy.borrower_id);

        builder.bind(id).execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Set the due date on a copy, leaving its status alone
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE copies SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }

        Ok(())
    }

    /// Mark a copy returned: back on the shelf, no due date, no borrower
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE copies SET status = $1, due_back = NULL, borrower_id = NULL WHERE id = $2",
        )
        .bind(LoanStatus::Available)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }

        Ok(())
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }

        Ok(())
    }
}
