// src/routes/mod.rs

use crate::{
    handlers::{
        ledger::{
            add_collection_record, delete_collection_record, get_employee_aggregate,
            list_collection_records, update_collection_record,
        },
        masterdata::{
            create_branch, create_employee, delete_branch, delete_employee, get_employee,
            list_branches, list_employees, update_employee,
        },
        rates::{
            delete_commission_tier, get_bonus_policy, get_commission_rates, get_deduction_policy,
            set_bonus_policy, set_commission_tier, set_deduction_policy,
        },
        sheets::{generate_sheet, get_current_sheet, get_sheet_rows, update_entry},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Master Data ──────────────────────────────────────
        .route("/branches", post(create_branch).get(list_branches))
        .route("/branches/{branch_id}", delete(delete_branch))
        .route("/employees", post(create_employee).get(list_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
        // ─── Collection Ledger ────────────────────────────────
        .route(
            "/collections",
            post(add_collection_record).get(list_collection_records),
        )
        .route(
            "/collections/{record_id}",
            put(update_collection_record).delete(delete_collection_record),
        )
        .route(
            "/employees/{employee_id}/aggregate",
            get(get_employee_aggregate),
        )
        // ─── Configuration ────────────────────────────────────
        .route("/commission-rates", get(get_commission_rates))
        .route(
            "/commission-rates/{tier}",
            put(set_commission_tier).delete(delete_commission_tier),
        )
        .route(
            "/policies/deductions",
            put(set_deduction_policy).get(get_deduction_policy),
        )
        .route("/policies/bonus", put(set_bonus_policy).get(get_bonus_policy))
        // ─── Salary Sheets ────────────────────────────────────
        .route("/sheets/generate", post(generate_sheet))
        .route("/sheets/current", get(get_current_sheet))
        .route("/sheets/current/rows", get(get_sheet_rows))
        .route("/entries/{entry_id}", patch(update_entry))
}
