//! Site summary service

use crate::{
    api::summary::SiteSummary, error::AppResult, models::copy::LoanStatus,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Headline counts for the site front page.
    ///
    /// `visits` is the caller's own visit counter; it comes back incremented
    /// so the caller can carry it to the next request.
    pub async fn site_summary(&self, visits: i64) -> AppResult<SiteSummary> {
        let pool = &self.repository.pool;

        let num_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;

        let num_copies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies")
            .fetch_one(pool)
            .await?;

        let num_copies_available: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE status = $1")
                .bind(LoanStatus::Available)
                .fetch_one(pool)
                .await?;

        let num_authors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(pool)
            .await?;

        let num_languages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(pool)
            .await?;

        Ok(SiteSummary {
            num_books,
            num_copies,
            num_copies_available,
            num_authors,
            num_languages,
            num_visits: visits + 1,
        })
    }

    /// Verify the database connection is usable.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
