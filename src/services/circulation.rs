//! Circulation service: loan queries and the renewal and return workflows

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, RenewalDateError},
    models::copy::{CopyDetails, LoanStatus, RenewalProposal},
    repository::Repository,
};

/// Longest renewal a librarian may grant, counted from today
pub const RENEWAL_WINDOW_DAYS: i64 = 28;

/// Renewal period offered by default, before the librarian confirms
const PROPOSAL_WEEKS: i64 = 3;

/// Check a proposed renewal date against the circulation window.
///
/// The date must not lie in the past and must not fall more than four weeks
/// after `today`. Valid dates come back unchanged. `today` is always supplied
/// by the caller; this function never reads the clock.
pub fn validate_renewal_date(
    candidate: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RenewalDateError> {
    if candidate < today {
        return Err(RenewalDateError::InPast);
    }
    if candidate > today + Duration::days(RENEWAL_WINDOW_DAYS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(candidate)
}

/// Default date offered when a librarian opens the renewal form
pub fn renewal_proposal(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(PROPOSAL_WEEKS)
}

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies currently on loan to one borrower, soonest due first
    pub async fn loans_for_borrower(
        &self,
        borrower_id: i32,
        today: NaiveDate,
    ) -> AppResult<Vec<CopyDetails>> {
        self.repository.copies.on_loan_to(borrower_id, today).await
    }

    /// Every copy currently on loan, soonest due first
    pub async fn all_borrowed(&self, today: NaiveDate) -> AppResult<Vec<CopyDetails>> {
        self.repository.copies.all_on_loan(today).await
    }

    /// Copy plus the default renewal date offered to the librarian
    pub async fn propose_renewal(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewalProposal> {
        let copy = self.repository.copies.get_details(id, today).await?;

        Ok(RenewalProposal {
            copy,
            renewal_date: renewal_proposal(today),
        })
    }

    /// Renew a copy: set its due date. Status is never touched here.
    pub async fn renew(
        &self,
        id: Uuid,
        renewal_date: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<CopyDetails> {
        // missing copy beats invalid date
        self.repository.copies.get_by_id(id).await?;

        let due_back = validate_renewal_date(renewal_date, today)?;
        self.repository.copies.set_due_back(id, due_back).await?;

        self.repository.copies.get_details(id, today).await
    }

    /// Mark an on-loan copy returned: back on the shelf with due date and
    /// borrower cleared. The only operation that transitions status.
    pub async fn return_copy(&self, id: Uuid, today: NaiveDate) -> AppResult<CopyDetails> {
        let copy = self.repository.copies.get_by_id(id).await?;

        if copy.status != LoanStatus::OnLoan {
            return Err(AppError::Validation(format!(
                "Copy {} is not on loan (status: {})",
                id,
                copy.status.label()
            )));
        }

        self.repository.copies.mark_returned(id).await?;

        self.repository.copies.get_details(id, today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renewal_today_is_valid() {
        let today = date(2024, 3, 1);
        assert_eq!(validate_renewal_date(today, today), Ok(today));
    }

    #[test]
    fn renewal_at_window_edge_is_valid() {
        let today = date(2024, 3, 1);
        let edge = date(2024, 3, 29);
        assert_eq!(validate_renewal_date(edge, today), Ok(edge));
    }

    #[test]
    fn renewal_in_past_rejected() {
        let today = date(2024, 3, 1);
        assert_eq!(
            validate_renewal_date(date(2024, 2, 29), today),
            Err(RenewalDateError::InPast)
        );
    }

    #[test]
    fn renewal_past_window_rejected() {
        let today = date(2024, 3, 1);
        assert_eq!(
            validate_renewal_date(date(2024, 3, 30), today),
            Err(RenewalDateError::TooFarAhead)
        );
    }

    #[test]
    fn renewal_mid_window_is_valid() {
        let today = date(2024, 3, 1);
        let mid = date(2024, 3, 20);
        assert_eq!(validate_renewal_date(mid, today), Ok(mid));
    }

    #[test]
    fn proposal_is_three_weeks_out() {
        assert_eq!(renewal_proposal(date(2024, 3, 1)), date(2024, 3, 22));
    }

    #[test]
    fn window_spans_month_boundary() {
        let today = date(2024, 12, 20);
        let edge = date(2025, 1, 17);
        assert_eq!(validate_renewal_date(edge, today), Ok(edge));
        assert_eq!(
            validate_renewal_date(date(2025, 1, 18), today),
            Err(RenewalDateError::TooFarAhead)
        );
    }
}
