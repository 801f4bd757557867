use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::info;

use super::aggregator::CompensationAggregator;
use super::domain::{
    Bonus, CallProcessingOutcome, DateRange, Manager, ManagerChanges, ManagerId, NewManager,
    NewPremium, Premium, PremiumChanges, PremiumId, ProcessedCallsRecord, SalaryView,
};
use super::engine::{manager_not_found, store_failure, CallProcessingEngine};
use super::query::CallHistoryQuery;
use super::store::{RecordStore, StoreError};
use crate::config::CompensationConfig;

/// Facade over managers, premiums, and the accrual engine. Input is validated here,
/// before any store access.
pub struct CompensationService<S> {
    store: Arc<S>,
    engine: CallProcessingEngine<S>,
    aggregator: CompensationAggregator<S>,
    calls: CallHistoryQuery<S>,
    config: CompensationConfig,
}

impl<S> CompensationService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, config: CompensationConfig) -> Self {
        Self {
            engine: CallProcessingEngine::new(store.clone(), config.month_window),
            aggregator: CompensationAggregator::new(store.clone()),
            calls: CallHistoryQuery::new(store.clone()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    pub fn list_managers(&self) -> Result<Vec<Manager>, CompensationError> {
        let managers = self
            .store
            .list_managers()
            .map_err(store_failure("list managers", "all managers"))?;
        if managers.is_empty() {
            return Err(CompensationError::NotFound("No managers found.".to_string()));
        }
        Ok(managers)
    }

    pub fn get_manager(&self, id: ManagerId) -> Result<Manager, CompensationError> {
        self.store
            .fetch_manager(id)
            .map_err(store_failure("fetch manager", id))?
            .ok_or_else(|| manager_not_found(id))
    }

    pub fn create_manager(&self, draft: NewManager) -> Result<Manager, CompensationError> {
        let draft = NewManager {
            name: validate_name(draft.name)?,
            ..draft
        };
        let requested = draft.id;

        let manager = self.store.insert_manager(draft).map_err(|err| match err {
            StoreError::Conflict => CompensationError::Conflict(format!(
                "Manager with id {} already exists.",
                requested.map_or_else(String::new, |id| id.to_string())
            )),
            other => store_failure(
                "create manager",
                requested.map_or_else(|| "new".to_string(), |id| id.to_string()),
            )(other),
        })?;

        info!(manager_id = manager.id.0, "manager created");
        Ok(manager)
    }

    pub fn update_manager(
        &self,
        id: ManagerId,
        changes: ManagerChanges,
    ) -> Result<Manager, CompensationError> {
        let name = validate_name(changes.name)?;
        let mut manager = self.get_manager(id)?;
        manager.name = name;
        manager.base_salary = changes.base_salary;

        self.store
            .update_manager(manager.clone())
            .map_err(|err| match err {
                StoreError::NotFound => manager_not_found(id),
                other => store_failure("update manager", id)(other),
            })?;

        info!(manager_id = id.0, "manager updated");
        Ok(manager)
    }

    pub fn delete_manager(&self, id: ManagerId) -> Result<(), CompensationError> {
        self.store.delete_manager(id).map_err(|err| match err {
            StoreError::NotFound => manager_not_found(id),
            other => store_failure("delete manager", id)(other),
        })?;
        info!(manager_id = id.0, "manager deleted");
        Ok(())
    }

    pub fn salary(&self, id: ManagerId) -> Result<SalaryView, CompensationError> {
        self.aggregator.salary(id)
    }

    /// Records `count` processed calls for the manager. `date` defaults to today.
    pub fn apply_call_processing(
        &self,
        id: ManagerId,
        count: u32,
        date: Option<NaiveDate>,
    ) -> Result<CallProcessingOutcome, CompensationError> {
        if count < 1 {
            return Err(CompensationError::InvalidInput(
                "count must be at least 1".to_string(),
            ));
        }
        if count > self.config.max_calls_per_request {
            return Err(CompensationError::InvalidInput(format!(
                "count must not exceed {}",
                self.config.max_calls_per_request
            )));
        }

        let date = date.unwrap_or_else(|| Local::now().date_naive());
        self.engine.apply(id, count, date)
    }

    pub fn bonus_history(
        &self,
        id: Option<ManagerId>,
        range: DateRange,
    ) -> Result<Vec<Bonus>, CompensationError> {
        self.aggregator.bonus_history(id, range)
    }

    pub fn processed_calls_history(
        &self,
        id: Option<ManagerId>,
        range: DateRange,
    ) -> Result<Vec<ProcessedCallsRecord>, CompensationError> {
        self.calls.history(id, range)
    }

    pub fn processed_calls_count(
        &self,
        id: ManagerId,
        range: DateRange,
    ) -> Result<u64, CompensationError> {
        self.calls.count(id, range)
    }

    pub fn list_premiums(
        &self,
        employee_id: Option<ManagerId>,
    ) -> Result<Vec<Premium>, CompensationError> {
        let entity = employee_id.map_or_else(|| "all managers".to_string(), |id| id.to_string());
        let premiums = self
            .store
            .premiums(employee_id)
            .map_err(store_failure("list premiums", entity))?;

        if premiums.is_empty() {
            let message = match employee_id {
                Some(id) => format!("No premiums found for employee with id {id}."),
                None => "No premiums found.".to_string(),
            };
            return Err(CompensationError::NotFound(message));
        }
        Ok(premiums)
    }

    pub fn get_premium(&self, id: PremiumId) -> Result<Premium, CompensationError> {
        self.store
            .fetch_premium(id)
            .map_err(store_failure("fetch premium", id))?
            .ok_or_else(|| premium_not_found(id))
    }

    pub fn create_premium(&self, draft: NewPremium) -> Result<Premium, CompensationError> {
        let volume = validate_volume(draft.volume)?;
        let requested = draft.id;
        let draft = NewPremium {
            volume,
            creation_date: Some(
                draft
                    .creation_date
                    .unwrap_or_else(|| Local::now().date_naive()),
            ),
            ..draft
        };

        let premium = self.store.insert_premium(draft).map_err(|err| match err {
            StoreError::Conflict => CompensationError::Conflict(format!(
                "Premium with id {} already exists.",
                requested.map_or_else(String::new, |id| id.to_string())
            )),
            other => store_failure(
                "create premium",
                requested.map_or_else(|| "new".to_string(), |id| id.to_string()),
            )(other),
        })?;

        info!(
            premium_id = premium.id.0,
            manager_id = premium.manager_id.0,
            "premium created"
        );
        Ok(premium)
    }

    pub fn update_premium(
        &self,
        id: PremiumId,
        changes: PremiumChanges,
    ) -> Result<Premium, CompensationError> {
        let volume = validate_volume(changes.volume)?;
        let mut premium = self.get_premium(id)?;
        premium.manager_id = changes.manager_id;
        premium.volume = volume;

        self.store
            .update_premium(premium.clone())
            .map_err(|err| match err {
                StoreError::NotFound => premium_not_found(id),
                other => store_failure("update premium", id)(other),
            })?;
        Ok(premium)
    }

    pub fn delete_premium(&self, id: PremiumId) -> Result<(), CompensationError> {
        self.store.delete_premium(id).map_err(|err| match err {
            StoreError::NotFound => premium_not_found(id),
            other => store_failure("delete premium", id)(other),
        })
    }
}

fn premium_not_found(id: PremiumId) -> CompensationError {
    CompensationError::NotFound(format!("Premium with id {id} not found."))
}

fn validate_name(name: String) -> Result<String, CompensationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CompensationError::InvalidInput(
            "manager name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_volume(volume: u32) -> Result<u32, CompensationError> {
    if volume == 0 {
        return Err(CompensationError::InvalidInput(
            "premium volume must be positive".to_string(),
        ));
    }
    Ok(volume)
}

/// Error raised by the compensation service and its components.
#[derive(Debug, thiserror::Error)]
pub enum CompensationError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{operation} failed for {entity}: {source}")]
    Store {
        operation: &'static str,
        entity: String,
        #[source]
        source: StoreError,
    },
}
