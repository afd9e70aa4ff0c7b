// src/handlers/rates.rs
//
// Admin-editable configuration: the commission rate table and the deduction
// and bonus policies. All of it is read by the engine as explicit parameters,
// never as ambient state.

use crate::{
    errors::{AppError, AppResult},
    models::{
        BonusPolicy, CommissionRateTable, CommissionStructure, DeductionPolicy,
        SetCommissionTierRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

fn validate_percentage(rate: Decimal) -> AppResult<()> {
    if rate < Decimal::ZERO || rate > dec!(100) {
        return Err(AppError::Validation(
            "Rates must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Get the full commission rate table
#[utoipa::path(
    get,
    path = "/api/v1/commission-rates",
    responses((status = 200, description = "Commission rate table", body = CommissionRateTable)),
    tag = "Configuration"
)]
pub async fn get_commission_rates(State(state): State<AppState>) -> Json<CommissionRateTable> {
    let store = state.store.read().await;
    Json(store.rates.clone())
}

/// Create or update one commission tier. Tier codes are open strings, so new
/// tiers are added here without a code change.
#[utoipa::path(
    put,
    path = "/api/v1/commission-rates/{tier}",
    params(("tier" = String, Path, description = "Tier code, e.g. A")),
    request_body = SetCommissionTierRequest,
    responses(
        (status = 200, description = "Tier saved", body = CommissionStructure),
        (status = 400, description = "Rate out of range"),
    ),
    tag = "Configuration"
)]
pub async fn set_commission_tier(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(body): Json<SetCommissionTierRequest>,
) -> AppResult<Json<CommissionStructure>> {
    if tier.trim().is_empty() {
        return Err(AppError::Validation("Tier code must not be empty".to_string()));
    }
    validate_percentage(body.own)?;
    validate_percentage(body.office)?;

    let rates = CommissionStructure {
        own: body.own,
        office: body.office,
    };
    let mut store = state.store.write().await;
    store.rates.insert(tier.clone(), rates.clone());
    info!("Commission tier '{}' set to own {}% / office {}%", tier, rates.own, rates.office);

    Ok(Json(rates))
}

/// Remove a commission tier. Entries still resolving to it will fail
/// recalculation with a configuration error until they are re-tiered.
#[utoipa::path(
    delete,
    path = "/api/v1/commission-rates/{tier}",
    params(("tier" = String, Path, description = "Tier code")),
    responses(
        (status = 204, description = "Tier removed"),
        (status = 404, description = "Tier not found"),
    ),
    tag = "Configuration"
)]
pub async fn delete_commission_tier(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .rates
        .remove(&tier)
        .ok_or_else(|| AppError::NotFound(format!("Commission tier '{}' not found", tier)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the attendance deduction policy
#[utoipa::path(
    get,
    path = "/api/v1/policies/deductions",
    responses((status = 200, description = "Deduction policy", body = DeductionPolicy)),
    tag = "Configuration"
)]
pub async fn get_deduction_policy(State(state): State<AppState>) -> Json<DeductionPolicy> {
    let store = state.store.read().await;
    Json(store.deduction_policy.clone())
}

/// Set the per-hour late and per-day absence deduction rates
#[utoipa::path(
    put,
    path = "/api/v1/policies/deductions",
    request_body = DeductionPolicy,
    responses(
        (status = 200, description = "Policy saved", body = DeductionPolicy),
        (status = 400, description = "Negative rate"),
    ),
    tag = "Configuration"
)]
pub async fn set_deduction_policy(
    State(state): State<AppState>,
    Json(body): Json<DeductionPolicy>,
) -> AppResult<Json<DeductionPolicy>> {
    if body.late_rate_per_hour < Decimal::ZERO || body.absence_rate_per_day < Decimal::ZERO {
        return Err(AppError::Validation(
            "Deduction rates must not be negative".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    store.deduction_policy = body.clone();
    Ok(Json(body))
}

/// Get the bonus schedule
#[utoipa::path(
    get,
    path = "/api/v1/policies/bonus",
    responses((status = 200, description = "Bonus policy", body = BonusPolicy)),
    tag = "Configuration"
)]
pub async fn get_bonus_policy(State(state): State<AppState>) -> Json<BonusPolicy> {
    let store = state.store.read().await;
    Json(store.bonus_policy.clone())
}

/// Set the account-opening bonus schedule
#[utoipa::path(
    put,
    path = "/api/v1/policies/bonus",
    request_body = BonusPolicy,
    responses(
        (status = 200, description = "Policy saved", body = BonusPolicy),
        (status = 400, description = "Negative tier value"),
    ),
    tag = "Configuration"
)]
pub async fn set_bonus_policy(
    State(state): State<AppState>,
    Json(body): Json<BonusPolicy>,
) -> AppResult<Json<BonusPolicy>> {
    for tier in &body.tiers {
        if tier.min_collection < Decimal::ZERO || tier.bonus_per_book < Decimal::ZERO {
            return Err(AppError::Validation(
                "Bonus thresholds and amounts must not be negative".to_string(),
            ));
        }
    }

    let mut store = state.store.write().await;
    store.bonus_policy = body.clone();
    Ok(Json(body))
}
