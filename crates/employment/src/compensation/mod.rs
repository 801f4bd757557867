//! Call processing and compensation accrual.
//!
//! Processed calls are turned into one bonus ledger entry per call, tiered by the
//! manager's running monthly counter. Salary is always derived from the base salary
//! and the ledger; nothing here caches counters or totals between requests.

pub mod aggregator;
pub mod classifier;
pub mod domain;
pub mod engine;
pub mod memory;
pub mod query;
pub mod router;
pub mod service;
pub mod store;
pub mod window;

#[cfg(test)]
mod tests;

pub use aggregator::CompensationAggregator;
pub use classifier::classify;
pub use domain::{
    Bonus, BonusCategory, BonusId, CallProcessingOutcome, CallsRecordId, DateRange, Manager,
    ManagerChanges, ManagerId, NewBonus, NewManager, NewPremium, Premium, PremiumChanges,
    PremiumId, ProcessedCallsRecord, SalaryView,
};
pub use engine::CallProcessingEngine;
pub use memory::InMemoryRecordStore;
pub use query::CallHistoryQuery;
pub use router::{compensation_router, CallParams, RangeParams};
pub use service::{CompensationError, CompensationService};
pub use store::{CallProcessingBatch, CallsRecordUpsert, RecordStore, StoreError};
pub use window::MonthWindow;
