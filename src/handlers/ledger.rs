// src/handlers/ledger.rs
//
// The center collection ledger. Records are the raw input of the engine:
// mutations here never touch stored aggregates — the grid re-derives them
// from the full ledger on every read.

use crate::{
    errors::{AppError, AppResult},
    models::{
        AddCollectionRecordRequest, CenterCollectionRecord, LedgerAggregate,
        UpdateCollectionRecordRequest,
    },
    services::engine,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

fn validate_amounts(amount: Decimal, loan_amount: Option<Decimal>) -> AppResult<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::Validation(
            "Collection amount must not be negative".to_string(),
        ));
    }
    if loan_amount.is_some_and(|l| l < Decimal::ZERO) {
        return Err(AppError::Validation(
            "Loan amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Record a collection visit to a somity center
#[utoipa::path(
    post,
    path = "/api/v1/collections",
    request_body = AddCollectionRecordRequest,
    responses(
        (status = 201, description = "Record added", body = CenterCollectionRecord),
        (status = 400, description = "Negative amount"),
        (status = 404, description = "Branch or employee not found"),
    ),
    tag = "Collection Ledger"
)]
pub async fn add_collection_record(
    State(state): State<AppState>,
    Json(body): Json<AddCollectionRecordRequest>,
) -> AppResult<(StatusCode, Json<CenterCollectionRecord>)> {
    validate_amounts(body.amount, body.loan_amount)?;
    if body.center_code < 0 {
        return Err(AppError::Validation("Center code must not be negative".to_string()));
    }

    let mut store = state.store.write().await;
    if !store.branches.contains_key(&body.branch_id) {
        return Err(AppError::NotFound(format!("Branch {} not found", body.branch_id)));
    }
    if !store.employees.contains_key(&body.employee_id) {
        return Err(AppError::NotFound(format!("Employee {} not found", body.employee_id)));
    }

    let record = CenterCollectionRecord {
        id: Uuid::new_v4(),
        branch_id: body.branch_id,
        employee_id: body.employee_id,
        center_code: body.center_code,
        amount: body.amount,
        loan_amount: body.loan_amount,
        class: body.class,
        created_at: Utc::now(),
    };
    store.ledger.push(record.clone());

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LedgerFilter {
    pub employee_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
}

/// List ledger records, optionally filtered by employee or branch
#[utoipa::path(
    get,
    path = "/api/v1/collections",
    params(LedgerFilter),
    responses((status = 200, description = "Ledger records", body = Vec<CenterCollectionRecord>)),
    tag = "Collection Ledger"
)]
pub async fn list_collection_records(
    State(state): State<AppState>,
    Query(filter): Query<LedgerFilter>,
) -> Json<Vec<CenterCollectionRecord>> {
    let store = state.store.read().await;
    let records = store
        .ledger
        .iter()
        .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
        .filter(|r| filter.branch_id.is_none_or(|id| r.branch_id == id))
        .cloned()
        .collect();
    Json(records)
}

/// Edit a ledger record. The next grid read re-aggregates from scratch.
#[utoipa::path(
    put,
    path = "/api/v1/collections/{record_id}",
    params(("record_id" = Uuid, Path, description = "Ledger record ID")),
    request_body = UpdateCollectionRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = CenterCollectionRecord),
        (status = 400, description = "Negative amount"),
        (status = 404, description = "Record not found"),
    ),
    tag = "Collection Ledger"
)]
pub async fn update_collection_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdateCollectionRecordRequest>,
) -> AppResult<Json<CenterCollectionRecord>> {
    if let Some(amount) = body.amount {
        validate_amounts(amount, None)?;
    }
    if body.loan_amount.is_some_and(|l| l < Decimal::ZERO) {
        return Err(AppError::Validation("Loan amount must not be negative".to_string()));
    }
    if body.center_code.is_some_and(|c| c < 0) {
        return Err(AppError::Validation("Center code must not be negative".to_string()));
    }

    let mut store = state.store.write().await;
    let record = store
        .ledger
        .iter_mut()
        .find(|r| r.id == record_id)
        .ok_or_else(|| AppError::NotFound(format!("Ledger record {} not found", record_id)))?;

    if let Some(center_code) = body.center_code {
        record.center_code = center_code;
    }
    if let Some(amount) = body.amount {
        record.amount = amount;
    }
    if let Some(loan_amount) = body.loan_amount {
        record.loan_amount = Some(loan_amount);
    }
    if let Some(class) = body.class {
        record.class = class;
    }

    Ok(Json(record.clone()))
}

/// Delete a ledger record
#[utoipa::path(
    delete,
    path = "/api/v1/collections/{record_id}",
    params(("record_id" = Uuid, Path, description = "Ledger record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found"),
    ),
    tag = "Collection Ledger"
)]
pub async fn delete_collection_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let before = store.ledger.len();
    store.ledger.retain(|r| r.id != record_id);
    if store.ledger.len() == before {
        return Err(AppError::NotFound(format!("Ledger record {} not found", record_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Current ledger aggregate for one employee: distinct own/office center
/// counts, collection sums and the loan total.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/aggregate",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Ledger aggregate", body = LedgerAggregate),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Collection Ledger"
)]
pub async fn get_employee_aggregate(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<LedgerAggregate>> {
    let store = state.store.read().await;
    if !store.employees.contains_key(&employee_id) {
        return Err(AppError::NotFound(format!("Employee {} not found", employee_id)));
    }
    Ok(Json(engine::aggregate(&store.ledger, employee_id)))
}
