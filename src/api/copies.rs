//! Book copy management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CopyDetails, CopyQuery, CreateCopy, UpdateCopy},
};

/// List copies, optionally filtered by loan status
#[utoipa::path(
    get,
    path = "/copies",
    tag = "copies",
    params(CopyQuery),
    responses(
        (status = 200, description = "List of copies ordered by due date", body = Vec<CopyDetails>)
    )
)]
pub async fn list_copies(
    State(state): State<crate::AppState>,
    Query(query): Query<CopyQuery>,
) -> AppResult<Json<Vec<CopyDetails>>> {
    let today = Utc::now().date_naive();
    let copies = state
        .services
        .catalog
        .list_copies(query.status, today)
        .await?;
    Ok(Json(copies))
}

/// Get a copy by ID
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy found", body = CopyDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CopyDetails>> {
    let today = Utc::now().date_naive();
    let copy = state.services.catalog.get_copy(id, today).await?;
    Ok(Json(copy))
}

/// Create a new copy of a book
#[utoipa::path(
    post,
    path = "/copies",
    tag = "copies",
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = CopyDetails),
        (status = 400, description = "Invalid copy data")
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<CopyDetails>)> {
    let today = Utc::now().date_naive();
    let copy = state.services.catalog.create_copy(payload, today).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Update an existing copy
#[utoipa::path(
    put,
    path = "/copies/{id}",
    tag = "copies",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = UpdateCopy,
    responses(
        (status = 200, description = "Copy updated", body = CopyDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCopy>,
) -> AppResult<Json<CopyDetails>> {
    let today = Utc::now().date_naive();
    let copy = state
        .services
        .catalog
        .update_copy(id, payload, today)
        .await?;
    Ok(Json(copy))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
