// src/handlers/masterdata.rs
//
// Thin CRUD over branch and employee master data. No algorithmic content —
// the engine only needs these for base salaries, default tiers and the
// denormalized snapshots attached to grid rows.

use crate::{
    errors::{AppError, AppResult},
    models::{
        Branch, CreateBranchRequest, CreateEmployeeRequest, Employee, UpdateEmployeeRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Create a branch
#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = CreateBranchRequest,
    responses((status = 201, description = "Branch created", body = Branch)),
    tag = "Master Data"
)]
pub async fn create_branch(
    State(state): State<AppState>,
    Json(body): Json<CreateBranchRequest>,
) -> AppResult<(StatusCode, Json<Branch>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Branch name must not be empty".to_string()));
    }

    let branch = Branch {
        id: Uuid::new_v4(),
        name: body.name,
        address: body.address,
        phone: body.phone,
        created_at: Utc::now(),
    };

    let mut store = state.store.write().await;
    store.branches.insert(branch.id, branch.clone());

    Ok((StatusCode::CREATED, Json(branch)))
}

/// List all branches
#[utoipa::path(
    get,
    path = "/api/v1/branches",
    responses((status = 200, description = "List of branches", body = Vec<Branch>)),
    tag = "Master Data"
)]
pub async fn list_branches(State(state): State<AppState>) -> Json<Vec<Branch>> {
    let store = state.store.read().await;
    let mut branches: Vec<Branch> = store.branches.values().cloned().collect();
    branches.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(branches)
}

/// Delete a branch. Existing salary entries keep working — grid rows whose
/// branch is gone simply drop out of the projection.
#[utoipa::path(
    delete,
    path = "/api/v1/branches/{branch_id}",
    params(("branch_id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 204, description = "Branch deleted"),
        (status = 404, description = "Branch not found"),
    ),
    tag = "Master Data"
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .branches
        .remove(&branch_id)
        .ok_or_else(|| AppError::NotFound(format!("Branch {} not found", branch_id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Branch not found"),
    ),
    tag = "Master Data"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    if body.base_salary < Decimal::ZERO {
        return Err(AppError::Validation("Base salary must not be negative".to_string()));
    }
    if body.commission_type.trim().is_empty() {
        return Err(AppError::Validation("Commission type must not be empty".to_string()));
    }

    let mut store = state.store.write().await;
    if !store.branches.contains_key(&body.branch_id) {
        return Err(AppError::NotFound(format!("Branch {} not found", body.branch_id)));
    }

    let employee = Employee {
        id: Uuid::new_v4(),
        branch_id: body.branch_id,
        name: body.name,
        designation: body.designation,
        base_salary: body.base_salary,
        commission_type: body.commission_type,
        created_at: Utc::now(),
    };
    store.employees.insert(employee.id, employee.clone());

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses((status = 200, description = "List of employees", body = Vec<Employee>)),
    tag = "Master Data"
)]
pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    let store = state.store.read().await;
    let mut employees: Vec<Employee> = store.employees.values().cloned().collect();
    employees.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(employees)
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Master Data"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let store = state.store.read().await;
    let employee = store
        .employees
        .get(&employee_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;
    Ok(Json(employee))
}

/// Update an employee's base salary and/or default commission tier
#[utoipa::path(
    patch,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Master Data"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    if let Some(salary) = body.base_salary {
        if salary < Decimal::ZERO {
            return Err(AppError::Validation("Base salary must not be negative".to_string()));
        }
    }
    if let Some(ref tier) = body.commission_type {
        if tier.trim().is_empty() {
            return Err(AppError::Validation("Commission type must not be empty".to_string()));
        }
    }

    let mut store = state.store.write().await;
    let employee = store
        .employees
        .get_mut(&employee_id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    if let Some(salary) = body.base_salary {
        employee.base_salary = salary;
    }
    if let Some(tier) = body.commission_type {
        employee.commission_type = tier;
    }

    Ok(Json(employee.clone()))
}

/// Delete an employee. Historical entries survive; their grid rows are
/// dropped from the projection rather than erroring.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Master Data"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .employees
        .remove(&employee_id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;
    Ok(StatusCode::NO_CONTENT)
}
