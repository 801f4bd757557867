use std::sync::Arc;

use super::domain::{DateRange, ManagerId, ProcessedCallsRecord};
use super::engine::store_failure;
use super::service::CompensationError;
use super::store::RecordStore;

/// Range-filtered lookups over the daily processed-call counters.
pub struct CallHistoryQuery<S> {
    store: Arc<S>,
}

impl<S> CallHistoryQuery<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn history(
        &self,
        manager_id: Option<ManagerId>,
        range: DateRange,
    ) -> Result<Vec<ProcessedCallsRecord>, CompensationError> {
        let entity = manager_id.map_or_else(|| "all managers".to_string(), |id| id.to_string());
        let mut records = self
            .store
            .processed_calls(&|record: &ProcessedCallsRecord| {
                range.contains(record.date) && manager_id.map_or(true, |id| record.manager_id == id)
            })
            .map_err(store_failure("load processed calls", entity))?;

        if records.is_empty() {
            return Err(CompensationError::NotFound(
                "No processed calls found.".to_string(),
            ));
        }

        records.sort_by_key(|record| (record.date, record.id));
        Ok(records)
    }

    /// Total calls processed by `manager_id` inside `range`.
    pub fn count(&self, manager_id: ManagerId, range: DateRange) -> Result<u64, CompensationError> {
        let records = self.history(Some(manager_id), range)?;
        Ok(records.iter().map(|record| u64::from(record.count)).sum())
    }
}
