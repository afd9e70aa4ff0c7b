use crate::{
    config::Config,
    models::{
        BonusPolicy, Branch, CenterCollectionRecord, CommissionRateTable, CommissionStructure,
        DeductionPolicy, Employee, SalaryEntry, SalarySheet,
    },
};
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// All application data, held in memory for the life of the process.
/// Durable persistence is deliberately out of scope; the single store lock
/// gives every recalculation a consistent snapshot of the rate table and
/// ledger (no rate change can land mid-computation of a row).
pub struct Store {
    pub branches: HashMap<Uuid, Branch>,
    pub employees: HashMap<Uuid, Employee>,
    pub ledger: Vec<CenterCollectionRecord>,
    pub rates: CommissionRateTable,
    pub deduction_policy: DeductionPolicy,
    pub bonus_policy: BonusPolicy,
    pub sheet: Option<SalarySheet>,
    pub entries: Vec<SalaryEntry>,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Self {
            branches: HashMap::new(),
            employees: HashMap::new(),
            ledger: Vec::new(),
            rates: default_commission_rates(),
            deduction_policy: DeductionPolicy {
                late_rate_per_hour: config.late_rate_per_hour,
                absence_rate_per_day: config.absence_rate_per_day,
            },
            bonus_policy: BonusPolicy::default(),
            sheet: None,
            entries: Vec::new(),
        }
    }
}

/// The stock tiers the operation has always used; administrators can edit or
/// extend them through the commission-rates endpoints.
pub fn default_commission_rates() -> CommissionRateTable {
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
        (
            "C".to_string(),
            CommissionStructure {
                own: dec!(8),
                office: dec!(6),
            },
        ),
    ])
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new(config))),
        }
    }
}
