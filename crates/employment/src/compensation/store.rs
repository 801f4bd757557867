use super::domain::{
    Bonus, CallsRecordId, Manager, ManagerId, NewBonus, NewManager, NewPremium, Premium, PremiumId,
    ProcessedCallsRecord,
};

/// Counter row written by a call processing commit. `id` is `None` for the first
/// calls a manager processes on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsRecordUpsert {
    pub id: Option<CallsRecordId>,
    pub manager_id: ManagerId,
    pub date: chrono::NaiveDate,
    pub count: u32,
}

/// Composite write applied by [`RecordStore::commit_call_processing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallProcessingBatch {
    pub manager_id: ManagerId,
    pub bonuses: Vec<NewBonus>,
    pub calls: CallsRecordUpsert,
}

/// Storage abstraction over managers, the bonus ledger, processed-call counters, and
/// premiums. Implementations own id generation for records created without one.
pub trait RecordStore: Send + Sync {
    fn insert_manager(&self, draft: NewManager) -> Result<Manager, StoreError>;
    fn fetch_manager(&self, id: ManagerId) -> Result<Option<Manager>, StoreError>;
    fn list_managers(&self) -> Result<Vec<Manager>, StoreError>;
    fn update_manager(&self, manager: Manager) -> Result<(), StoreError>;
    fn delete_manager(&self, id: ManagerId) -> Result<(), StoreError>;

    fn bonuses(&self, predicate: &dyn Fn(&Bonus) -> bool) -> Result<Vec<Bonus>, StoreError>;
    fn processed_calls(
        &self,
        predicate: &dyn Fn(&ProcessedCallsRecord) -> bool,
    ) -> Result<Vec<ProcessedCallsRecord>, StoreError>;

    /// Appends every bonus and upserts the counter row as one transaction. Fails with
    /// `NotFound` without writing anything when the manager no longer exists.
    fn commit_call_processing(&self, batch: CallProcessingBatch) -> Result<(), StoreError>;

    fn insert_premium(&self, premium: NewPremium) -> Result<Premium, StoreError>;
    fn fetch_premium(&self, id: PremiumId) -> Result<Option<Premium>, StoreError>;
    fn premiums(&self, manager_id: Option<ManagerId>) -> Result<Vec<Premium>, StoreError>;
    fn update_premium(&self, premium: Premium) -> Result<(), StoreError>;
    fn delete_premium(&self, id: PremiumId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
