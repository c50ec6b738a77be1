//! Book copy model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Availability of a physical copy, stored as a one-letter code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

// ---------------------------------------------------------------------------
// BookCopy
// ---------------------------------------------------------------------------

/// Full copy model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    /// Unique ID for this particular copy across the whole library
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    /// Identifier of the borrowing principal, owned by the identity provider
    pub borrower_id: Option<i32>,
}

impl BookCopy {
    /// A copy is overdue when it has a due date in the past
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_back.map_or(false, |due| due < today)
    }
}

/// Internal row structure for copy queries joined with the book title
#[derive(Debug, Clone, FromRow)]
pub struct CopyRow {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
}

impl CopyRow {
    pub fn into_details(self, today: NaiveDate) -> CopyDetails {
        let is_overdue = self.due_back.map_or(false, |due| due < today);
        CopyDetails {
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            status: self.status,
            status_label: self.status.label().to_string(),
            borrower_id: self.borrower_id,
            is_overdue,
        }
    }
}

/// Copy representation for list and detail views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopyDetails {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub status_label: String,
    pub borrower_id: Option<i32>,
    pub is_overdue: bool,
}

/// Copy list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CopyQuery {
    pub status: Option<LoanStatus>,
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
}

/// Update copy request. Absent fields keep their current value;
/// due date and borrower are cleared through the return workflow.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCopy {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
}

/// Renew copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewCopy {
    pub renewal_date: NaiveDate,
}

/// Proposed renewal for a copy, offered before the librarian confirms
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewalProposal {
    pub copy: CopyDetails,
    pub renewal_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_due(due_back: Option<NaiveDate>) -> BookCopy {
        BookCopy {
            id: Uuid::new_v4(),
            book_id: Some(1),
            imprint: "Gallimard, 1954".to_string(),
            due_back,
            status: LoanStatus::OnLoan,
            borrower_id: Some(7),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_when_due_date_passed() {
        let copy = copy_due(Some(date(2024, 3, 1)));
        assert!(copy.is_overdue(date(2024, 3, 2)));
    }

    #[test]
    fn not_overdue_on_due_date() {
        let copy = copy_due(Some(date(2024, 3, 1)));
        assert!(!copy.is_overdue(date(2024, 3, 1)));
    }

    #[test]
    fn not_overdue_without_due_date() {
        let copy = copy_due(None);
        assert!(!copy.is_overdue(date(2024, 3, 1)));
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(status.as_str().parse::<LoanStatus>(), Ok(status));
        }
        assert!("x".parse::<LoanStatus>().is_err());
    }
}
