use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::compensation::domain::{
    Bonus, Manager, ManagerId, NewManager, NewPremium, Premium, PremiumId, ProcessedCallsRecord,
};
use crate::compensation::memory::InMemoryRecordStore;
use crate::compensation::store::{CallProcessingBatch, RecordStore, StoreError};
use crate::compensation::{compensation_router, CompensationService, MonthWindow};
use crate::config::CompensationConfig;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn config(window: MonthWindow) -> CompensationConfig {
    CompensationConfig {
        month_window: window,
        max_calls_per_request: 1_000,
    }
}

pub(super) fn build_service() -> (
    CompensationService<InMemoryRecordStore>,
    Arc<InMemoryRecordStore>,
) {
    build_service_with(MonthWindow::MonthOfYear)
}

pub(super) fn build_service_with(
    window: MonthWindow,
) -> (
    CompensationService<InMemoryRecordStore>,
    Arc<InMemoryRecordStore>,
) {
    let store = Arc::new(InMemoryRecordStore::new());
    let service = CompensationService::new(store.clone(), config(window));
    (service, store)
}

pub(super) fn seed_manager<S>(service: &CompensationService<S>, id: u32, base_salary: u32) -> Manager
where
    S: RecordStore + 'static,
{
    service
        .create_manager(NewManager {
            id: Some(ManagerId(id)),
            name: format!("Manager {id}"),
            base_salary,
        })
        .expect("manager created")
}

pub(super) fn router_with_service(
    service: CompensationService<InMemoryRecordStore>,
) -> axum::Router {
    compensation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}

/// Store whose every operation fails, for error propagation checks.
pub(super) struct UnavailableStore;

fn offline() -> StoreError {
    StoreError::Unavailable("offline".to_string())
}

impl RecordStore for UnavailableStore {
    fn insert_manager(&self, _draft: NewManager) -> Result<Manager, StoreError> {
        Err(offline())
    }

    fn fetch_manager(&self, _id: ManagerId) -> Result<Option<Manager>, StoreError> {
        Err(offline())
    }

    fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        Err(offline())
    }

    fn update_manager(&self, _manager: Manager) -> Result<(), StoreError> {
        Err(offline())
    }

    fn delete_manager(&self, _id: ManagerId) -> Result<(), StoreError> {
        Err(offline())
    }

    fn bonuses(&self, _predicate: &dyn Fn(&Bonus) -> bool) -> Result<Vec<Bonus>, StoreError> {
        Err(offline())
    }

    fn processed_calls(
        &self,
        _predicate: &dyn Fn(&ProcessedCallsRecord) -> bool,
    ) -> Result<Vec<ProcessedCallsRecord>, StoreError> {
        Err(offline())
    }

    fn commit_call_processing(&self, _batch: CallProcessingBatch) -> Result<(), StoreError> {
        Err(offline())
    }

    fn insert_premium(&self, _premium: NewPremium) -> Result<Premium, StoreError> {
        Err(offline())
    }

    fn fetch_premium(&self, _id: PremiumId) -> Result<Option<Premium>, StoreError> {
        Err(offline())
    }

    fn premiums(&self, _manager_id: Option<ManagerId>) -> Result<Vec<Premium>, StoreError> {
        Err(offline())
    }

    fn update_premium(&self, _premium: Premium) -> Result<(), StoreError> {
        Err(offline())
    }

    fn delete_premium(&self, _id: PremiumId) -> Result<(), StoreError> {
        Err(offline())
    }
}

/// Delegates to an in-memory store but refuses every call processing commit.
#[derive(Default)]
pub(super) struct RejectingCommitStore {
    pub(super) inner: InMemoryRecordStore,
}

impl RecordStore for RejectingCommitStore {
    fn insert_manager(&self, draft: NewManager) -> Result<Manager, StoreError> {
        self.inner.insert_manager(draft)
    }

    fn fetch_manager(&self, id: ManagerId) -> Result<Option<Manager>, StoreError> {
        self.inner.fetch_manager(id)
    }

    fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        self.inner.list_managers()
    }

    fn update_manager(&self, manager: Manager) -> Result<(), StoreError> {
        self.inner.update_manager(manager)
    }

    fn delete_manager(&self, id: ManagerId) -> Result<(), StoreError> {
        self.inner.delete_manager(id)
    }

    fn bonuses(&self, predicate: &dyn Fn(&Bonus) -> bool) -> Result<Vec<Bonus>, StoreError> {
        self.inner.bonuses(predicate)
    }

    fn processed_calls(
        &self,
        predicate: &dyn Fn(&ProcessedCallsRecord) -> bool,
    ) -> Result<Vec<ProcessedCallsRecord>, StoreError> {
        self.inner.processed_calls(predicate)
    }

    fn commit_call_processing(&self, _batch: CallProcessingBatch) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("transaction aborted".to_string()))
    }

    fn insert_premium(&self, premium: NewPremium) -> Result<Premium, StoreError> {
        self.inner.insert_premium(premium)
    }

    fn fetch_premium(&self, id: PremiumId) -> Result<Option<Premium>, StoreError> {
        self.inner.fetch_premium(id)
    }

    fn premiums(&self, manager_id: Option<ManagerId>) -> Result<Vec<Premium>, StoreError> {
        self.inner.premiums(manager_id)
    }

    fn update_premium(&self, premium: Premium) -> Result<(), StoreError> {
        self.inner.update_premium(premium)
    }

    fn delete_premium(&self, id: PremiumId) -> Result<(), StoreError> {
        self.inner.delete_premium(id)
    }
}
