use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::classifier::classify;
use super::domain::{
    BonusCategory, CallProcessingOutcome, ManagerId, NewBonus, ProcessedCallsRecord,
};
use super::service::CompensationError;
use super::store::{CallProcessingBatch, CallsRecordUpsert, RecordStore, StoreError};
use super::window::MonthWindow;

/// Converts "calls processed" events into bonus ledger entries and daily counters.
///
/// The monthly counter is recomputed from stored rows on every request. Requests for
/// the same manager are serialized through a per-manager lock so two of them can
/// never observe the same prior count.
pub struct CallProcessingEngine<S> {
    store: Arc<S>,
    window: MonthWindow,
    locks: Mutex<HashMap<ManagerId, Arc<Mutex<()>>>>,
}

impl<S> CallProcessingEngine<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, window: MonthWindow) -> Self {
        Self {
            store,
            window,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    fn manager_lock(&self, manager_id: ManagerId) -> Result<Arc<Mutex<()>>, CompensationError> {
        let mut locks = self.locks.lock().map_err(|_| poisoned(manager_id))?;
        Ok(locks.entry(manager_id).or_default().clone())
    }

    /// Applies `count` processed calls on `date`. `count` must already be validated
    /// as positive.
    pub fn apply(
        &self,
        manager_id: ManagerId,
        count: u32,
        date: NaiveDate,
    ) -> Result<CallProcessingOutcome, CompensationError> {
        // Unknown ids never get a lock entry. The commit re-checks existence.
        self.ensure_manager(manager_id)?;

        let lock = self.manager_lock(manager_id)?;
        let result = match lock.lock() {
            Ok(_serialized) => self.apply_serialized(manager_id, count, date),
            Err(_) => Err(poisoned(manager_id)),
        };
        self.release_lock(manager_id, lock);
        result
    }

    fn ensure_manager(&self, manager_id: ManagerId) -> Result<(), CompensationError> {
        self.store
            .fetch_manager(manager_id)
            .map_err(store_failure("fetch manager", manager_id))?
            .map(|_| ())
            .ok_or_else(|| manager_not_found(manager_id))
    }

    /// Drops the table entry once no other request holds or waits on it.
    fn release_lock(&self, manager_id: ManagerId, lock: Arc<Mutex<()>>) {
        drop(lock);
        if let Ok(mut locks) = self.locks.lock() {
            let idle = locks
                .get(&manager_id)
                .is_some_and(|entry| Arc::strong_count(entry) == 1);
            if idle {
                locks.remove(&manager_id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    fn apply_serialized(
        &self,
        manager_id: ManagerId,
        count: u32,
        date: NaiveDate,
    ) -> Result<CallProcessingOutcome, CompensationError> {
        let window = self.window;
        let month_rows = self
            .store
            .processed_calls(&|record: &ProcessedCallsRecord| {
                record.manager_id == manager_id && window.contains(date, record.date)
            })
            .map_err(store_failure("load monthly calls", manager_id))?;

        let prior_monthly_count: u64 = month_rows.iter().map(|row| u64::from(row.count)).sum();
        debug!(
            manager_id = manager_id.0,
            %date,
            prior_monthly_count,
            window = window.label(),
            "loaded monthly counter"
        );

        let mut outcome = CallProcessingOutcome {
            manager_id,
            date,
            processed: count,
            prior_monthly_count,
            monthly_count: prior_monthly_count,
            low: 0,
            medium: 0,
            high: 0,
            accrued: 0,
        };

        let mut bonuses = Vec::with_capacity(count as usize);
        for _ in 0..count {
            outcome.monthly_count += 1;
            let category = classify(outcome.monthly_count);
            match category {
                BonusCategory::Low => outcome.low += 1,
                BonusCategory::Medium => outcome.medium += 1,
                BonusCategory::High => outcome.high += 1,
            }
            outcome.accrued += u64::from(category.amount());
            bonuses.push(NewBonus {
                manager_id,
                category,
                creation_date: date,
            });
        }

        let calls = match month_rows.iter().find(|row| row.date == date) {
            Some(existing) => CallsRecordUpsert {
                id: Some(existing.id),
                manager_id,
                date,
                count: existing.count.checked_add(count).ok_or_else(|| {
                    CompensationError::InvalidInput(format!(
                        "processed call counter for manager {manager_id} on {date} would overflow"
                    ))
                })?,
            },
            None => CallsRecordUpsert {
                id: None,
                manager_id,
                date,
                count,
            },
        };

        self.store
            .commit_call_processing(CallProcessingBatch {
                manager_id,
                bonuses,
                calls,
            })
            .map_err(|err| match err {
                StoreError::NotFound => manager_not_found(manager_id),
                other => store_failure("commit call processing", manager_id)(other),
            })?;

        info!(
            manager_id = manager_id.0,
            %date,
            processed = count,
            monthly_count = outcome.monthly_count,
            accrued = outcome.accrued,
            "call processing applied"
        );

        Ok(outcome)
    }
}

pub(crate) fn manager_not_found(manager_id: ManagerId) -> CompensationError {
    CompensationError::NotFound(format!("Manager with id {manager_id} not found."))
}

pub(crate) fn store_failure(
    operation: &'static str,
    entity: impl ToString,
) -> impl FnOnce(StoreError) -> CompensationError {
    let entity = entity.to_string();
    move |source| CompensationError::Store {
        operation,
        entity,
        source,
    }
}

fn poisoned(manager_id: ManagerId) -> CompensationError {
    CompensationError::Store {
        operation: "serialize call processing",
        entity: manager_id.to_string(),
        source: StoreError::Unavailable("manager lock poisoned".to_string()),
    }
}
