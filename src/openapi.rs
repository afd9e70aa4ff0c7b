// src/openapi.rs

use crate::models::{
    AddCollectionRecordRequest, BonusPolicy, BonusTier, Branch, CenterCollectionRecord,
    CollectionClass, CommissionStructure, CreateBranchRequest, CreateEmployeeRequest,
    DeductionPolicy, Employee, GenerateSheetRequest, LedgerAggregate, SalaryEntry, SalaryRow,
    SalarySheet, SetCommissionTierRequest, UpdateCollectionRecordRequest, UpdateEmployeeRequest,
    UpdateEntryRequest,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Somity Payroll API",
        version = "1.0.0",
        description = "Monthly salary sheets for a multi-branch microfinance operation. \
            Salaries are derived from somity center collections (own and office classes), \
            account-opening book counts and attendance inputs; every grid read re-aggregates \
            the collection ledger and recalculates each row in full, so derived figures can \
            never drift from their source records.",
        license(name = "MIT")
    ),
    paths(
        // Master data
        crate::handlers::masterdata::create_branch,
        crate::handlers::masterdata::list_branches,
        crate::handlers::masterdata::delete_branch,
        crate::handlers::masterdata::create_employee,
        crate::handlers::masterdata::list_employees,
        crate::handlers::masterdata::get_employee,
        crate::handlers::masterdata::update_employee,
        crate::handlers::masterdata::delete_employee,
        // Collection ledger
        crate::handlers::ledger::add_collection_record,
        crate::handlers::ledger::list_collection_records,
        crate::handlers::ledger::update_collection_record,
        crate::handlers::ledger::delete_collection_record,
        crate::handlers::ledger::get_employee_aggregate,
        // Configuration
        crate::handlers::rates::get_commission_rates,
        crate::handlers::rates::set_commission_tier,
        crate::handlers::rates::delete_commission_tier,
        crate::handlers::rates::get_deduction_policy,
        crate::handlers::rates::set_deduction_policy,
        crate::handlers::rates::get_bonus_policy,
        crate::handlers::rates::set_bonus_policy,
        // Salary sheets
        crate::handlers::sheets::generate_sheet,
        crate::handlers::sheets::get_current_sheet,
        crate::handlers::sheets::get_sheet_rows,
        crate::handlers::sheets::update_entry,
    ),
    components(
        schemas(
            Branch, CreateBranchRequest,
            Employee, CreateEmployeeRequest, UpdateEmployeeRequest,
            CommissionStructure, SetCommissionTierRequest,
            DeductionPolicy, BonusPolicy, BonusTier,
            CollectionClass, CenterCollectionRecord,
            AddCollectionRecordRequest, UpdateCollectionRecordRequest, LedgerAggregate,
            SalarySheet, GenerateSheetRequest,
            SalaryEntry, UpdateEntryRequest, SalaryRow,
        )
    ),
    tags(
        (name = "Master Data", description = "Branches and employees"),
        (name = "Collection Ledger", description = "Somity center collection records and aggregates"),
        (name = "Configuration", description = "Commission rate table and deduction/bonus policies"),
        (name = "Salary Sheets", description = "Generate sheets, edit rows, read the recalculated grid"),
    )
)]
pub struct ApiDoc;
