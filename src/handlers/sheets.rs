// src/handlers/sheets.rs
//
// Salary sheet generation, row edits and the grid projection. The grid is
// never served from stored derived fields: every GET re-runs aggregation and
// recalculation over the current ledger and rate table.

use crate::{
    errors::{AppError, AppResult},
    models::{
        GenerateSheetRequest, SalaryEntry, SalaryRow, SalarySheet, UpdateEntryRequest,
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
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

/// Payroll periods are month-scoped: "YYYY-MM".
fn validate_month(month: &str) -> AppResult<()> {
    let valid = month.len() == 7
        && month.as_bytes()[4] == b'-'
        && month[..4].chars().all(|c| c.is_ascii_digit())
        && month[5..].chars().all(|c| c.is_ascii_digit())
        && month[5..].parse::<u8>().is_ok_and(|m| (1..=12).contains(&m));
    if !valid {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid payroll month (expected YYYY-MM)",
            month
        )));
    }
    Ok(())
}

/// Generate the salary sheet for a month.
///
/// Builds a zeroed entry per employee in the selected branches and runs the
/// first recalculation pass. Regenerating replaces the previous sheet and its
/// entries wholesale — entries are never migrated between generations.
#[utoipa::path(
    post,
    path = "/api/v1/sheets/generate",
    request_body = GenerateSheetRequest,
    responses(
        (status = 201, description = "Sheet generated", body = SalarySheet),
        (status = 400, description = "Invalid month or empty branch selection"),
        (status = 422, description = "An employee resolves to an unconfigured commission tier"),
    ),
    tag = "Salary Sheets"
)]
pub async fn generate_sheet(
    State(state): State<AppState>,
    Json(body): Json<GenerateSheetRequest>,
) -> AppResult<(StatusCode, Json<SalarySheet>)> {
    validate_month(&body.month)?;
    if body.branch_ids.is_empty() {
        return Err(AppError::Validation(
            "Select at least one branch".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    for branch_id in &body.branch_ids {
        if !store.branches.contains_key(branch_id) {
            return Err(AppError::NotFound(format!("Branch {} not found", branch_id)));
        }
    }

    let sheet = SalarySheet {
        id: Uuid::new_v4(),
        month: body.month.clone(),
        branch_ids: body.branch_ids.clone(),
        created_at: Utc::now(),
    };

    let mut entries = Vec::new();
    for employee in store
        .employees
        .values()
        .filter(|e| body.branch_ids.contains(&e.branch_id))
    {
        let entry = engine::create_entry(
            sheet.id,
            employee.id,
            employee.base_salary,
            &employee.commission_type,
        );
        let entry = engine::recalculate(
            &entry,
            employee.base_salary,
            &store.rates,
            Some(&employee.commission_type),
            &store.deduction_policy,
            &store.bonus_policy,
        )?;
        entries.push(entry);
    }

    info!(
        "Generated sheet for {} with {} entries across {} branches",
        sheet.month,
        entries.len(),
        sheet.branch_ids.len()
    );

    store.sheet = Some(sheet.clone());
    store.entries = entries;

    Ok((StatusCode::CREATED, Json(sheet)))
}

/// Get the currently generated sheet
#[utoipa::path(
    get,
    path = "/api/v1/sheets/current",
    responses(
        (status = 200, description = "Current sheet", body = SalarySheet),
        (status = 404, description = "No sheet generated"),
    ),
    tag = "Salary Sheets"
)]
pub async fn get_current_sheet(State(state): State<AppState>) -> AppResult<Json<SalarySheet>> {
    let store = state.store.read().await;
    let sheet = store.sheet.clone().ok_or(AppError::NoSheetGenerated)?;
    Ok(Json(sheet))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RowsFilter {
    /// Restrict the grid to one branch.
    pub branch_id: Option<Uuid>,
}

/// Grid rows for the current sheet.
///
/// Each row is aggregated from the ledger, recalculated against the current
/// rate table and policies, and carries employee/branch snapshots. Rows whose
/// employee or branch has been deleted are dropped, not errored.
#[utoipa::path(
    get,
    path = "/api/v1/sheets/current/rows",
    params(RowsFilter),
    responses(
        (status = 200, description = "Recalculated grid rows", body = Vec<SalaryRow>),
        (status = 404, description = "No sheet generated"),
        (status = 422, description = "A row resolves to an unconfigured commission tier"),
    ),
    tag = "Salary Sheets"
)]
pub async fn get_sheet_rows(
    State(state): State<AppState>,
    Query(filter): Query<RowsFilter>,
) -> AppResult<Json<Vec<SalaryRow>>> {
    let store = state.store.read().await;
    if store.sheet.is_none() {
        return Err(AppError::NoSheetGenerated);
    }

    let rows = engine::project_rows(
        &store.entries,
        &store.ledger,
        &store.employees,
        &store.branches,
        &store.rates,
        &store.deduction_policy,
        &store.bonus_policy,
        |employee| filter.branch_id.is_none_or(|id| employee.branch_id == id),
    )?;

    Ok(Json(rows))
}

fn validate_entry_update(body: &UpdateEntryRequest) -> AppResult<()> {
    let amounts = [
        ("basic_salary", body.basic_salary),
        ("input_late_hours", body.input_late_hours),
        ("input_absent_days", body.input_absent_days),
        ("deduction_cash_advance", body.deduction_cash_advance),
        ("deduction_misconduct", body.deduction_misconduct),
        ("deduction_unlawful", body.deduction_unlawful),
        ("deduction_tours", body.deduction_tours),
        ("deduction_others", body.deduction_others),
    ];
    for (field, value) in amounts {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(AppError::Validation(format!("{} must not be negative", field)));
        }
    }

    let counts = [
        ("book_1_5", body.book_1_5),
        ("book_3", body.book_3),
        ("book_5", body.book_5),
        ("book_8", body.book_8),
        ("book_10", body.book_10),
        ("book_12", body.book_12),
        ("book_no_bonus", body.book_no_bonus),
    ];
    for (field, value) in counts {
        if value.is_some_and(|v| v < 0) {
            return Err(AppError::Validation(format!("{} must not be negative", field)));
        }
    }
    Ok(())
}

fn apply_entry_update(entry: &mut SalaryEntry, body: UpdateEntryRequest) {
    if let Some(v) = body.basic_salary {
        entry.basic_salary = v;
    }
    if let Some(v) = body.commission_type {
        // An empty string clears the row-level override.
        entry.commission_type = if v.is_empty() { None } else { Some(v) };
    }
    if let Some(v) = body.book_1_5 {
        entry.book_1_5 = v;
    }
    if let Some(v) = body.book_3 {
        entry.book_3 = v;
    }
    if let Some(v) = body.book_5 {
        entry.book_5 = v;
    }
    if let Some(v) = body.book_8 {
        entry.book_8 = v;
    }
    if let Some(v) = body.book_10 {
        entry.book_10 = v;
    }
    if let Some(v) = body.book_12 {
        entry.book_12 = v;
    }
    if let Some(v) = body.book_no_bonus {
        entry.book_no_bonus = v;
    }
    if let Some(v) = body.input_late_hours {
        entry.input_late_hours = v;
    }
    if let Some(v) = body.input_absent_days {
        entry.input_absent_days = v;
    }
    if let Some(v) = body.deduction_cash_advance {
        entry.deduction_cash_advance = v;
    }
    if let Some(v) = body.deduction_misconduct {
        entry.deduction_misconduct = v;
    }
    if let Some(v) = body.deduction_unlawful {
        entry.deduction_unlawful = v;
    }
    if let Some(v) = body.deduction_tours {
        entry.deduction_tours = v;
    }
    if let Some(v) = body.deduction_others {
        entry.deduction_others = v;
    }
}

/// Edit a row's editable inputs.
///
/// Applies the patch, merges the latest ledger aggregate and recalculates
/// before storing, so the stored entry is never left with stale derived
/// fields. Negative inputs are rejected here — the engine never clamps.
#[utoipa::path(
    patch,
    path = "/api/v1/entries/{entry_id}",
    params(("entry_id" = Uuid, Path, description = "Salary entry ID")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated and recalculated", body = SalaryEntry),
        (status = 400, description = "Negative input"),
        (status = 404, description = "Entry or employee not found"),
        (status = 422, description = "Unconfigured commission tier"),
    ),
    tag = "Salary Sheets"
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<SalaryEntry>> {
    validate_entry_update(&body)?;

    let mut store = state.store.write().await;

    let index = store
        .entries
        .iter()
        .position(|e| e.id == entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Salary entry {} not found", entry_id)))?;

    let mut entry = store.entries[index].clone();
    apply_entry_update(&mut entry, body);

    let employee = store
        .employees
        .get(&entry.employee_id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", entry.employee_id)))?;

    let agg = engine::aggregate(&store.ledger, entry.employee_id);
    let merged = engine::merge_aggregate(&entry, &agg);
    let recalculated = engine::recalculate(
        &merged,
        employee.base_salary,
        &store.rates,
        Some(&employee.commission_type),
        &store.deduction_policy,
        &store.bonus_policy,
    )?;

    store.entries[index] = recalculated.clone();
    Ok(Json(recalculated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn month_validation_accepts_year_dash_month() {
        assert!(validate_month("2024-01").is_ok());
        assert!(validate_month("1999-12").is_ok());
    }

    #[test]
    fn month_validation_rejects_malformed_periods() {
        for bad in ["2024-13", "2024-00", "2024/01", "202401", "24-01", "2024-1", ""] {
            assert!(validate_month(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn negative_inputs_are_rejected_at_the_boundary() {
        let body = UpdateEntryRequest {
            deduction_cash_advance: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(validate_entry_update(&body).is_err());

        let body = UpdateEntryRequest {
            book_5: Some(-3),
            ..Default::default()
        };
        assert!(validate_entry_update(&body).is_err());

        let body = UpdateEntryRequest {
            basic_salary: Some(dec!(12000)),
            book_5: Some(3),
            ..Default::default()
        };
        assert!(validate_entry_update(&body).is_ok());
    }

    #[test]
    fn update_applies_inputs_and_clears_empty_override() {
        let mut entry = crate::services::engine::create_entry(
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec!(20000),
            "B",
        );
        apply_entry_update(
            &mut entry,
            UpdateEntryRequest {
                commission_type: Some(String::new()),
                book_3: Some(4),
                deduction_tours: Some(dec!(250)),
                ..Default::default()
            },
        );

        assert_eq!(entry.commission_type, None);
        assert_eq!(entry.book_3, 4);
        assert_eq!(entry.deduction_tours, dec!(250));
    }
}
