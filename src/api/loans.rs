//! Loan listing and circulation endpoints
//!
//! Renewal and return require the `can_mark_returned` permission; the loan
//! lists only require an authenticated caller.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CopyDetails, RenewCopy, RenewalProposal},
};

use super::{Principal, PERM_MARK_RETURNED};

/// List the caller's borrowed copies
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    responses(
        (status = 200, description = "Copies on loan to the caller, soonest due first", body = Vec<CopyDetails>),
        (status = 401, description = "Missing or invalid identity header")
    )
)]
pub async fn get_my_loans(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<CopyDetails>>> {
    let today = Utc::now().date_naive();
    let loans = state
        .services
        .circulation
        .loans_for_borrower(principal.borrower_id, today)
        .await?;
    Ok(Json(loans))
}

/// List all copies currently on loan
#[utoipa::path(
    get,
    path = "/loans/borrowed",
    tag = "loans",
    responses(
        (status = 200, description = "All copies on loan, soonest due first", body = Vec<CopyDetails>),
        (status = 401, description = "Missing or invalid identity header")
    )
)]
pub async fn get_all_borrowed(
    State(state): State<crate::AppState>,
    _principal: Principal,
) -> AppResult<Json<Vec<CopyDetails>>> {
    let today = Utc::now().date_naive();
    let loans = state.services.circulation.all_borrowed(today).await?;
    Ok(Json(loans))
}

/// Propose a renewal date for a copy
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy with a proposed renewal date three weeks out", body = RenewalProposal),
        (status = 401, description = "Missing or invalid identity header"),
        (status = 403, description = "Caller lacks the can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn propose_renewal(
    State(state): State<crate::AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    principal.require_permission(PERM_MARK_RETURNED)?;
    let today = Utc::now().date_naive();
    let proposal = state.services.circulation.propose_renewal(id, today).await?;
    Ok(Json(proposal))
}

/// Renew a copy until the given date
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewCopy,
    responses(
        (status = 200, description = "Copy renewed", body = CopyDetails),
        (status = 400, description = "Renewal date in the past or more than 4 weeks ahead"),
        (status = 401, description = "Missing or invalid identity header"),
        (status = 403, description = "Caller lacks the can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_copy(
    State(state): State<crate::AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenewCopy>,
) -> AppResult<Json<CopyDetails>> {
    principal.require_permission(PERM_MARK_RETURNED)?;
    let today = Utc::now().date_naive();
    let copy = state
        .services
        .circulation
        .renew(id, payload.renewal_date, today)
        .await?;
    Ok(Json(copy))
}

/// Return a copy, making it available again
#[utoipa::path(
    post,
    path = "/copies/{id}/return",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy returned and available", body = CopyDetails),
        (status = 400, description = "Copy is not on loan"),
        (status = 401, description = "Missing or invalid identity header"),
        (status = 403, description = "Caller lacks the can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CopyDetails>> {
    principal.require_permission(PERM_MARK_RETURNED)?;
    let today = Utc::now().date_naive();
    let copy = state.services.circulation.return_copy(id, today).await?;
    Ok(Json(copy))
}
