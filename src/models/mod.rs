// src/models/mod.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Branch ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBranchRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

// ─── Employee ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub designation: String,
    pub base_salary: Decimal,
    /// Default commission tier from master data; a salary entry may override it per row.
    pub commission_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub branch_id: Uuid,
    pub name: String,
    pub designation: String,
    pub base_salary: Decimal,
    pub commission_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub base_salary: Option<Decimal>,
    pub commission_type: Option<String>,
}

// ─── Commission Rates ─────────────────────────────────────────────────────────

/// Own/office commission percentages for one tier, e.g. tier "A" = { own: 8, office: 4 }.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommissionStructure {
    pub own: Decimal,
    pub office: Decimal,
}

/// Tier code → rates. Keys are open strings so new tiers can be added
/// through configuration alone, without touching code.
pub type CommissionRateTable = BTreeMap<String, CommissionStructure>;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCommissionTierRequest {
    pub own: Decimal,
    pub office: Decimal,
}

// ─── Deduction & Bonus Policies ───────────────────────────────────────────────

/// Linear attendance deduction rates. Both are plain configuration — the engine
/// multiplies, it never hard-codes a rate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeductionPolicy {
    pub late_rate_per_hour: Decimal,
    pub absence_rate_per_day: Decimal,
}

/// One bonus tier: books of `term` pay `bonus_per_book` each, but only once the
/// entry's total collection has reached `min_collection`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BonusTier {
    /// Book term this tier applies to: 1.5, 3, 5, 8, 10 or 12.
    pub term: Decimal,
    pub min_collection: Decimal,
    pub bonus_per_book: Decimal,
}

/// The account-opening bonus schedule. Empty tiers means no bonus is paid
/// until an administrator configures the schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BonusPolicy {
    pub tiers: Vec<BonusTier>,
}

// ─── Center Collection Ledger ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionClass {
    Own,
    Office,
}

/// One dated collection event at a somity center. Append-only from the engine's
/// point of view; edits and deletes go through the ledger handlers and the grid
/// simply re-aggregates on the next read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CenterCollectionRecord {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub employee_id: Uuid,
    pub center_code: i32,
    /// Savings collection.
    pub amount: Decimal,
    /// Loan collection, if any was taken at the same visit.
    pub loan_amount: Option<Decimal>,
    pub class: CollectionClass,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCollectionRecordRequest {
    pub branch_id: Uuid,
    pub employee_id: Uuid,
    pub center_code: i32,
    pub amount: Decimal,
    pub loan_amount: Option<Decimal>,
    pub class: CollectionClass,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCollectionRecordRequest {
    pub center_code: Option<i32>,
    pub amount: Option<Decimal>,
    pub loan_amount: Option<Decimal>,
    pub class: Option<CollectionClass>,
}

/// Per-employee reduction of the collection ledger: distinct-center counts and
/// amount sums per class, plus the loan total across both classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LedgerAggregate {
    pub own_count: i32,
    pub own_amount: Decimal,
    pub office_count: i32,
    pub office_amount: Decimal,
    pub loan_total: Decimal,
}

// ─── Salary Sheet & Entries ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalarySheet {
    pub id: Uuid,
    /// Format: "YYYY-MM"
    pub month: String,
    pub branch_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateSheetRequest {
    /// Format: "YYYY-MM"
    pub month: String,
    pub branch_ids: Vec<Uuid>,
}

/// One payroll row for (sheet, employee).
///
/// Editable inputs (basic salary, commission-type override, book counts,
/// attendance inputs, manual deductions) are set by the user; every other
/// field is derived and overwritten in full by each recalculation pass —
/// an entry is never authoritative until it has been recalculated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryEntry {
    pub id: Uuid,
    pub salary_sheet_id: Uuid,
    pub employee_id: Uuid,

    /// Defaults to the employee's base salary but is independently editable.
    pub basic_salary: Decimal,
    /// Row-level tier override; wins over the employee's master-data tier.
    pub commission_type: Option<String>,

    // Somity aggregates, merged in from the collection ledger before each
    // recalculation.
    pub own_somity_count: i32,
    pub own_somity_collection: Decimal,
    pub office_somity_count: i32,
    pub office_somity_collection: Decimal,

    // Combined center info (derived).
    pub center_count: i32,
    pub center_collection: Decimal,

    pub total_loan_collection: Decimal,

    // Book counts per term bucket. Raw counts — the term value selects the
    // bonus tier, it is not a weight.
    pub book_1_5: i32,
    pub book_3: i32,
    pub book_5: i32,
    pub book_8: i32,
    pub book_10: i32,
    pub book_12: i32,
    pub book_no_bonus: i32,

    // Attendance inputs.
    pub input_late_hours: Decimal,
    pub input_absent_days: Decimal,

    // Deductions. Cash advance, misconduct, unlawful, tours and others are
    // manual amounts; late and absence are derived from the attendance inputs.
    pub deduction_cash_advance: Decimal,
    pub deduction_late: Decimal,
    pub deduction_abs: Decimal,
    pub deduction_misconduct: Decimal,
    pub deduction_unlawful: Decimal,
    pub deduction_tours: Decimal,
    pub deduction_others: Decimal,

    // Derived totals.
    pub total_books: i32,
    pub total_collection: Decimal,
    pub total_deductions: Decimal,
    pub commission: Decimal,
    pub bonus: Decimal,
    pub final_salary: Decimal,
}

/// Partial update of an entry's editable inputs. Derived fields cannot be set
/// from the outside; the handler recalculates right after applying this.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEntryRequest {
    pub basic_salary: Option<Decimal>,
    /// Set to "" to clear the row-level override.
    pub commission_type: Option<String>,
    pub book_1_5: Option<i32>,
    pub book_3: Option<i32>,
    pub book_5: Option<i32>,
    pub book_8: Option<i32>,
    pub book_10: Option<i32>,
    pub book_12: Option<i32>,
    pub book_no_bonus: Option<i32>,
    pub input_late_hours: Option<Decimal>,
    pub input_absent_days: Option<Decimal>,
    pub deduction_cash_advance: Option<Decimal>,
    pub deduction_misconduct: Option<Decimal>,
    pub deduction_unlawful: Option<Decimal>,
    pub deduction_tours: Option<Decimal>,
    pub deduction_others: Option<Decimal>,
}

/// Read-only grid row: a recalculated entry plus employee and branch snapshots.
/// Never stored — projected from the entry, the ledger and master data on read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalaryRow {
    #[serde(flatten)]
    pub entry: SalaryEntry,
    pub employee: Employee,
    pub branch: Branch,
}
