// src/services/engine.rs
//
// The salary computation & aggregation engine. Everything in here is pure and
// synchronous: aggregates are re-derived from the full ledger and every derived
// field of an entry is overwritten on every recalculation, so stored rows can
// never drift from their source inputs.

use crate::models::{
    BonusPolicy, Branch, CenterCollectionRecord, CollectionClass, CommissionRateTable,
    DeductionPolicy, Employee, LedgerAggregate, SalaryEntry, SalaryRow,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Tier used when neither the entry nor the employee names one.
pub const FALLBACK_COMMISSION_TYPE: &str = "A";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The resolved tier has no row in the rate table. Surfaced loudly: a
    /// missing tier is misconfigured master data, not a zero-commission state.
    #[error("commission type '{0}' is not configured in the rate table")]
    UnknownCommissionType(String),
}

/// Reduce the collection ledger to per-class totals for one employee.
///
/// Counts are over **distinct** center codes — three visits to center 7 are
/// one center. An employee with no records gets an all-zero aggregate.
pub fn aggregate(records: &[CenterCollectionRecord], employee_id: Uuid) -> LedgerAggregate {
    let mut own_centers: HashSet<i32> = HashSet::new();
    let mut office_centers: HashSet<i32> = HashSet::new();
    let mut own_amount = Decimal::ZERO;
    let mut office_amount = Decimal::ZERO;
    let mut loan_total = Decimal::ZERO;

    for record in records.iter().filter(|r| r.employee_id == employee_id) {
        match record.class {
            CollectionClass::Own => {
                own_centers.insert(record.center_code);
                own_amount += record.amount;
            }
            CollectionClass::Office => {
                office_centers.insert(record.center_code);
                office_amount += record.amount;
            }
        }
        loan_total += record.loan_amount.unwrap_or(Decimal::ZERO);
    }

    LedgerAggregate {
        own_count: own_centers.len() as i32,
        own_amount,
        office_count: office_centers.len() as i32,
        office_amount,
        loan_total,
    }
}

/// Build a zeroed entry skeleton for one employee on one sheet.
///
/// Basic salary is prefilled from master data; every derived field starts at
/// zero and only becomes meaningful after the first recalculation pass.
pub fn create_entry(
    sheet_id: Uuid,
    employee_id: Uuid,
    base_salary: Decimal,
    commission_type: &str,
) -> SalaryEntry {
    SalaryEntry {
        id: Uuid::new_v4(),
        salary_sheet_id: sheet_id,
        employee_id,
        basic_salary: base_salary,
        commission_type: Some(commission_type.to_string()),
        own_somity_count: 0,
        own_somity_collection: Decimal::ZERO,
        office_somity_count: 0,
        office_somity_collection: Decimal::ZERO,
        center_count: 0,
        center_collection: Decimal::ZERO,
        total_loan_collection: Decimal::ZERO,
        book_1_5: 0,
        book_3: 0,
        book_5: 0,
        book_8: 0,
        book_10: 0,
        book_12: 0,
        book_no_bonus: 0,
        input_late_hours: Decimal::ZERO,
        input_absent_days: Decimal::ZERO,
        deduction_cash_advance: Decimal::ZERO,
        deduction_late: Decimal::ZERO,
        deduction_abs: Decimal::ZERO,
        deduction_misconduct: Decimal::ZERO,
        deduction_unlawful: Decimal::ZERO,
        deduction_tours: Decimal::ZERO,
        deduction_others: Decimal::ZERO,
        total_books: 0,
        total_collection: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        commission: Decimal::ZERO,
        bonus: Decimal::ZERO,
        final_salary: Decimal::ZERO,
    }
}

/// Effective tier: row-level override first (a supervisor may re-tier a single
/// payroll line without touching the employee record), then the employee's
/// master-data default, then the fallback. Empty strings count as absent.
fn resolve_commission_type<'a>(
    entry_type: Option<&'a str>,
    employee_default: Option<&'a str>,
) -> &'a str {
    entry_type
        .filter(|t| !t.is_empty())
        .or(employee_default.filter(|t| !t.is_empty()))
        .unwrap_or(FALLBACK_COMMISSION_TYPE)
}

fn book_count_for_term(entry: &SalaryEntry, term: Decimal) -> i32 {
    if term == dec!(1.5) {
        entry.book_1_5
    } else if term == dec!(3) {
        entry.book_3
    } else if term == dec!(5) {
        entry.book_5
    } else if term == dec!(8) {
        entry.book_8
    } else if term == dec!(10) {
        entry.book_10
    } else if term == dec!(12) {
        entry.book_12
    } else {
        0
    }
}

/// Recompute every derived field of an entry from its editable inputs, the
/// rate table and the injected policies.
///
/// This is a total, pure function: no I/O, no hidden state, and it never reads
/// a previously-stored derived field to produce a new one. Callers are
/// expected to have merged the latest ledger aggregate into the somity fields
/// first (see [`project_rows`]); recalculation does not query the ledger.
pub fn recalculate(
    entry: &SalaryEntry,
    base_salary: Decimal,
    rates: &CommissionRateTable,
    employee_default_type: Option<&str>,
    deductions: &DeductionPolicy,
    bonus_policy: &BonusPolicy,
) -> Result<SalaryEntry, EngineError> {
    let hundred = dec!(100);

    let effective_type =
        resolve_commission_type(entry.commission_type.as_deref(), employee_default_type);
    let rate = rates
        .get(effective_type)
        .ok_or_else(|| EngineError::UnknownCommissionType(effective_type.to_string()))?;

    // A zero basic salary means the row was never initialized; fall back to
    // the employee's base.
    let basic_salary = if entry.basic_salary.is_zero() {
        base_salary
    } else {
        entry.basic_salary
    };

    let total_collection = entry.own_somity_collection + entry.office_somity_collection;

    let commission = entry.own_somity_collection * rate.own / hundred
        + entry.office_somity_collection * rate.office / hundred;

    let total_books = entry.book_1_5
        + entry.book_3
        + entry.book_5
        + entry.book_8
        + entry.book_10
        + entry.book_12
        + entry.book_no_bonus;

    let bonus: Decimal = bonus_policy
        .tiers
        .iter()
        .filter(|tier| total_collection >= tier.min_collection)
        .map(|tier| tier.bonus_per_book * Decimal::from(book_count_for_term(entry, tier.term)))
        .sum();

    let deduction_late = entry.input_late_hours * deductions.late_rate_per_hour;
    let deduction_abs = entry.input_absent_days * deductions.absence_rate_per_day;

    let total_deductions = entry.deduction_cash_advance
        + deduction_late
        + deduction_abs
        + entry.deduction_misconduct
        + entry.deduction_unlawful
        + entry.deduction_tours
        + entry.deduction_others;

    // No floor at zero: a heavily-deducted row may legitimately go negative
    // and the sheet should show it.
    let final_salary = basic_salary + commission + bonus - total_deductions;

    Ok(SalaryEntry {
        basic_salary,
        center_count: entry.own_somity_count + entry.office_somity_count,
        center_collection: total_collection,
        deduction_late,
        deduction_abs,
        total_books,
        total_collection,
        total_deductions,
        commission,
        bonus,
        final_salary,
        ..entry.clone()
    })
}

/// Merge a ledger aggregate into an entry's somity fields. The result still
/// needs a recalculation pass; the typed aggregate keeps the two steps from
/// being skipped accidentally.
pub fn merge_aggregate(entry: &SalaryEntry, agg: &LedgerAggregate) -> SalaryEntry {
    SalaryEntry {
        own_somity_count: agg.own_count,
        own_somity_collection: agg.own_amount,
        office_somity_count: agg.office_count,
        office_somity_collection: agg.office_amount,
        total_loan_collection: agg.loan_total,
        ..entry.clone()
    }
}

/// Project entries into display rows: aggregate the ledger per employee, merge,
/// recalculate, and attach employee/branch snapshots.
///
/// Entries whose employee or branch has been deleted, or whose employee falls
/// outside `scope`, are silently dropped — they are out of scope for the view,
/// not an error.
pub fn project_rows<F>(
    entries: &[SalaryEntry],
    records: &[CenterCollectionRecord],
    employees: &HashMap<Uuid, Employee>,
    branches: &HashMap<Uuid, Branch>,
    rates: &CommissionRateTable,
    deductions: &DeductionPolicy,
    bonus_policy: &BonusPolicy,
    scope: F,
) -> Result<Vec<SalaryRow>, EngineError>
where
    F: Fn(&Employee) -> bool,
{
    let mut rows = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(employee) = employees.get(&entry.employee_id) else {
            continue;
        };
        if !scope(employee) {
            continue;
        }
        let Some(branch) = branches.get(&employee.branch_id) else {
            continue;
        };

        let agg = aggregate(records, entry.employee_id);
        let merged = merge_aggregate(entry, &agg);
        let recalculated = recalculate(
            &merged,
            employee.base_salary,
            rates,
            Some(&employee.commission_type),
            deductions,
            bonus_policy,
        )?;

        rows.push(SalaryRow {
            entry: recalculated,
            employee: employee.clone(),
            branch: branch.clone(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BonusTier, CommissionStructure};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn rate_table() -> CommissionRateTable {
        BTreeMap::from([
            (
                "A".to_string(),
                CommissionStructure {
                    own: dec!(8),
                    office: dec!(4),
                },
            ),
            (
                "B".to_string(),
                CommissionStructure {
                    own: dec!(10),
                    office: dec!(6),
                },
            ),
        ])
    }

    fn zero_deductions() -> DeductionPolicy {
        DeductionPolicy {
            late_rate_per_hour: Decimal::ZERO,
            absence_rate_per_day: Decimal::ZERO,
        }
    }

    fn record(
        employee_id: Uuid,
        center_code: i32,
        amount: Decimal,
        loan: Option<Decimal>,
        class: CollectionClass,
    ) -> CenterCollectionRecord {
        CenterCollectionRecord {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            employee_id,
            center_code,
            amount,
            loan_amount: loan,
            class,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn aggregate_counts_distinct_centers_and_sums_amounts() {
        let emp = Uuid::new_v4();
        let records = vec![
            record(emp, 1, dec!(100), None, CollectionClass::Own),
            record(emp, 1, dec!(50), None, CollectionClass::Own),
            record(emp, 2, dec!(30), None, CollectionClass::Own),
        ];

        let agg = aggregate(&records, emp);
        assert_eq!(agg.own_count, 2);
        assert_eq!(agg.own_amount, dec!(180));
        assert_eq!(agg.office_count, 0);
        assert_eq!(agg.office_amount, Decimal::ZERO);
    }

    #[test]
    fn aggregate_sums_loans_across_both_classes_and_ignores_other_employees() {
        let emp = Uuid::new_v4();
        let other = Uuid::new_v4();
        let records = vec![
            record(emp, 1, dec!(100), Some(dec!(40)), CollectionClass::Own),
            record(emp, 9, dec!(200), None, CollectionClass::Office),
            record(emp, 9, dec!(10), Some(dec!(5)), CollectionClass::Office),
            record(other, 1, dec!(999), Some(dec!(999)), CollectionClass::Own),
        ];

        let agg = aggregate(&records, emp);
        assert_eq!(agg.own_count, 1);
        assert_eq!(agg.own_amount, dec!(100));
        assert_eq!(agg.office_count, 1);
        assert_eq!(agg.office_amount, dec!(210));
        assert_eq!(agg.loan_total, dec!(45));
    }

    #[test]
    fn aggregate_on_employee_with_no_records_is_all_zero() {
        let agg = aggregate(&[], Uuid::new_v4());
        assert_eq!(
            agg,
            LedgerAggregate {
                own_count: 0,
                own_amount: Decimal::ZERO,
                office_count: 0,
                office_amount: Decimal::ZERO,
                loan_total: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn factory_prefills_basic_salary_and_zeroes_everything_else() {
        let entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "B");
        assert_eq!(entry.basic_salary, dec!(20000));
        assert_eq!(entry.commission_type.as_deref(), Some("B"));
        assert_eq!(entry.total_books, 0);
        assert_eq!(entry.commission, Decimal::ZERO);
        assert_eq!(entry.total_deductions, Decimal::ZERO);
        assert_eq!(entry.final_salary, Decimal::ZERO);
    }

    #[test]
    fn commission_formula_matches_rate_table() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "A");
        entry.own_somity_collection = dec!(1000);
        entry.office_somity_collection = dec!(500);

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        // 1000 * 8% + 500 * 4%
        assert_eq!(out.commission, dec!(100));
        assert_eq!(out.total_collection, dec!(1500));
        assert_eq!(out.center_collection, dec!(1500));
    }

    #[test]
    fn row_override_wins_over_employee_default() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "B");
        entry.own_somity_collection = dec!(1000);

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            Some("A"),
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        // Tier B own rate is 10%, not tier A's 8%.
        assert_eq!(out.commission, dec!(100));
    }

    #[test]
    fn empty_override_falls_back_to_employee_default() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "");
        entry.own_somity_collection = dec!(1000);

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            Some("B"),
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.commission, dec!(100));
    }

    #[test]
    fn missing_tier_is_a_configuration_error_not_a_zero_row() {
        let entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "Z");

        let err = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap_err();

        assert_eq!(err, EngineError::UnknownCommissionType("Z".to_string()));
    }

    #[test]
    fn zero_record_entry_recalculates_to_zero_commission() {
        let entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(15000), "A");
        let out = recalculate(
            &entry,
            dec!(15000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.commission, Decimal::ZERO);
        assert_eq!(out.total_collection, Decimal::ZERO);
        assert_eq!(out.final_salary, dec!(15000));
    }

    #[test]
    fn final_salary_end_to_end() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "A");
        entry.own_somity_collection = dec!(1000);
        entry.office_somity_collection = dec!(500);
        entry.deduction_cash_advance = dec!(500);

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.total_deductions, dec!(500));
        // 20000 + 100 + 0 - 500
        assert_eq!(out.final_salary, dec!(19600));
    }

    #[test]
    fn attendance_deductions_are_linear_in_their_inputs() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "A");
        entry.input_late_hours = dec!(3);
        entry.input_absent_days = dec!(2);

        let policy = DeductionPolicy {
            late_rate_per_hour: dec!(50),
            absence_rate_per_day: dec!(400),
        };
        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &policy,
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.deduction_late, dec!(150));
        assert_eq!(out.deduction_abs, dec!(800));
        assert_eq!(out.total_deductions, dec!(950));
        assert_eq!(out.final_salary, dec!(19050));
    }

    #[test]
    fn final_salary_may_go_negative() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(1000), "A");
        entry.deduction_misconduct = dec!(2500);

        let out = recalculate(
            &entry,
            dec!(1000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.final_salary, dec!(-1500));
    }

    #[test]
    fn bonus_tiers_pay_only_once_collection_reaches_threshold() {
        let policy = BonusPolicy {
            tiers: vec![
                BonusTier {
                    term: dec!(5),
                    min_collection: dec!(1000),
                    bonus_per_book: dec!(100),
                },
                BonusTier {
                    term: dec!(12),
                    min_collection: dec!(5000),
                    bonus_per_book: dec!(300),
                },
            ],
        };

        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "A");
        entry.book_5 = 3;
        entry.book_12 = 2;
        entry.book_no_bonus = 4;
        entry.own_somity_collection = dec!(1200);

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &zero_deductions(),
            &policy,
        )
        .unwrap();

        // Only the 5-term tier is unlocked at 1200 collection.
        assert_eq!(out.bonus, dec!(300));
        assert_eq!(out.total_books, 9);
    }

    #[test]
    fn recalculation_is_idempotent_and_deterministic() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(18000), "B");
        entry.own_somity_count = 4;
        entry.own_somity_collection = dec!(2500);
        entry.office_somity_count = 2;
        entry.office_somity_collection = dec!(900);
        entry.book_3 = 5;
        entry.input_late_hours = dec!(1.5);
        entry.deduction_tours = dec!(120);

        let policy = DeductionPolicy {
            late_rate_per_hour: dec!(60),
            absence_rate_per_day: dec!(500),
        };
        let bonus = BonusPolicy {
            tiers: vec![BonusTier {
                term: dec!(3),
                min_collection: dec!(2000),
                bonus_per_book: dec!(50),
            }],
        };

        let once = recalculate(&entry, dec!(18000), &rate_table(), None, &policy, &bonus).unwrap();
        let twice = recalculate(&once, dec!(18000), &rate_table(), None, &policy, &bonus).unwrap();
        let again = recalculate(&entry, dec!(18000), &rate_table(), None, &policy, &bonus).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, again);
    }

    #[test]
    fn stale_derived_fields_are_overwritten_in_full() {
        let mut entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(20000), "A");
        // Simulate drift: garbage in every derived slot.
        entry.commission = dec!(9999);
        entry.total_collection = dec!(9999);
        entry.total_deductions = dec!(9999);
        entry.final_salary = dec!(9999);
        entry.total_books = 77;
        entry.center_count = 42;

        let out = recalculate(
            &entry,
            dec!(20000),
            &rate_table(),
            None,
            &zero_deductions(),
            &BonusPolicy::default(),
        )
        .unwrap();

        assert_eq!(out.commission, Decimal::ZERO);
        assert_eq!(out.total_collection, Decimal::ZERO);
        assert_eq!(out.total_deductions, Decimal::ZERO);
        assert_eq!(out.total_books, 0);
        assert_eq!(out.center_count, 0);
        assert_eq!(out.final_salary, dec!(20000));
    }

    fn employee(branch_id: Uuid, tier: &str, base: Decimal) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            branch_id,
            name: "Test Employee".to_string(),
            designation: "Field Officer".to_string(),
            base_salary: base,
            commission_type: tier.to_string(),
            created_at: Utc::now(),
        }
    }

    fn branch() -> Branch {
        Branch {
            id: Uuid::new_v4(),
            name: "Main Branch".to_string(),
            address: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn projection_merges_ledger_and_drops_rows_without_master_data() {
        let b = branch();
        let emp = employee(b.id, "A", dec!(20000));
        let ghost_entry = create_entry(Uuid::new_v4(), Uuid::new_v4(), dec!(10000), "A");

        let sheet = Uuid::new_v4();
        let entry = create_entry(sheet, emp.id, emp.base_salary, &emp.commission_type);
        let records = vec![
            record(emp.id, 1, dec!(1000), Some(dec!(200)), CollectionClass::Own),
            record(emp.id, 2, dec!(500), None, CollectionClass::Office),
        ];

        let employees = HashMap::from([(emp.id, emp.clone())]);
        let branches = HashMap::from([(b.id, b.clone())]);

        let rows = project_rows(
            &[entry, ghost_entry],
            &records,
            &employees,
            &branches,
            &rate_table(),
            &zero_deductions(),
            &BonusPolicy::default(),
            |_| true,
        )
        .unwrap();

        // The entry referencing a deleted employee is dropped, not an error.
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.entry.own_somity_count, 1);
        assert_eq!(row.entry.own_somity_collection, dec!(1000));
        assert_eq!(row.entry.office_somity_collection, dec!(500));
        assert_eq!(row.entry.total_loan_collection, dec!(200));
        assert_eq!(row.entry.commission, dec!(100));
        assert_eq!(row.entry.final_salary, dec!(20100));
        assert_eq!(row.employee.id, row.entry.employee_id);
        assert_eq!(row.branch.id, b.id);
    }

    #[test]
    fn projection_applies_the_scope_predicate() {
        let b = branch();
        let visible = employee(b.id, "A", dec!(20000));
        let hidden = employee(Uuid::new_v4(), "A", dec!(20000));

        let sheet = Uuid::new_v4();
        let entries = vec![
            create_entry(sheet, visible.id, visible.base_salary, "A"),
            create_entry(sheet, hidden.id, hidden.base_salary, "A"),
        ];

        let employees = HashMap::from([(visible.id, visible.clone()), (hidden.id, hidden.clone())]);
        let branches = HashMap::from([(b.id, b.clone())]);

        let rows = project_rows(
            &entries,
            &[],
            &employees,
            &branches,
            &rate_table(),
            &zero_deductions(),
            &BonusPolicy::default(),
            |e| e.branch_id == b.id,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.employee_id, visible.id);
    }

    #[test]
    fn projection_surfaces_unknown_tier_loudly() {
        let b = branch();
        let emp = employee(b.id, "NOPE", dec!(20000));
        let entry = create_entry(Uuid::new_v4(), emp.id, emp.base_salary, "NOPE");

        let employees = HashMap::from([(emp.id, emp.clone())]);
        let branches = HashMap::from([(b.id, b.clone())]);

        let err = project_rows(
            &[entry],
            &[],
            &employees,
            &branches,
            &rate_table(),
            &zero_deductions(),
            &BonusPolicy::default(),
            |_| true,
        )
        .unwrap_err();

        assert_eq!(err, EngineError::UnknownCommissionType("NOPE".to_string()));
    }
}
