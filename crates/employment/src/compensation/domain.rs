use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service::CompensationError;

/// Identifier wrapper for managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ManagerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BonusId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallsRecordId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PremiumId(pub u32);

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PremiumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored manager. Salary is derived from `base_salary` plus the bonus ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: ManagerId,
    pub name: String,
    pub base_salary: u32,
}

/// Creation payload; the store assigns an id when none is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewManager {
    #[serde(default)]
    pub id: Option<ManagerId>,
    pub name: String,
    #[serde(default)]
    pub base_salary: u32,
}

/// Fields replaced by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerChanges {
    pub name: String,
    pub base_salary: u32,
}

/// Tier of a single processed call. The discriminant is the bonus amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BonusCategory {
    Low = 100,
    Medium = 200,
    High = 300,
}

impl BonusCategory {
    pub const ALL: [BonusCategory; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn amount(self) -> u32 {
        self as u32
    }

    pub const fn label(self) -> &'static str {
        match self {
            BonusCategory::Low => "low",
            BonusCategory::Medium => "medium",
            BonusCategory::High => "high",
        }
    }
}

/// Append-only ledger entry, one per processed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: BonusId,
    pub manager_id: ManagerId,
    pub category: BonusCategory,
    pub creation_date: NaiveDate,
}

/// Bonus awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBonus {
    pub manager_id: ManagerId,
    pub category: BonusCategory,
    pub creation_date: NaiveDate,
}

/// Daily aggregate of calls processed by one manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedCallsRecord {
    pub id: CallsRecordId,
    pub manager_id: ManagerId,
    pub date: NaiveDate,
    pub count: u32,
}

/// Independently managed payment, unrelated to call processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premium {
    pub id: PremiumId,
    pub manager_id: ManagerId,
    pub creation_date: NaiveDate,
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPremium {
    #[serde(default)]
    pub id: Option<PremiumId>,
    pub manager_id: ManagerId,
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumChanges {
    pub manager_id: ManagerId,
    pub volume: u32,
}

/// Inclusive date range. Omitted bounds extend to the representable extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, CompensationError> {
        let from = from.unwrap_or(NaiveDate::MIN);
        let to = to.unwrap_or(NaiveDate::MAX);
        if from > to {
            return Err(CompensationError::InvalidInput(format!(
                "range start {from} is after range end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn unbounded() -> Self {
        Self {
            from: NaiveDate::MIN,
            to: NaiveDate::MAX,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Salary response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryView {
    pub id: ManagerId,
    pub salary: u64,
}

/// Totals produced by a single call processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallProcessingOutcome {
    pub manager_id: ManagerId,
    pub date: NaiveDate,
    pub processed: u32,
    pub prior_monthly_count: u64,
    pub monthly_count: u64,
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub accrued: u64,
}

impl CallProcessingOutcome {
    pub fn count_for(&self, category: BonusCategory) -> u32 {
        match category {
            BonusCategory::Low => self.low,
            BonusCategory::Medium => self.medium,
            BonusCategory::High => self.high,
        }
    }
}
