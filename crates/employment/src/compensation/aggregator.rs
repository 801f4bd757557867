use std::sync::Arc;

use tracing::debug;

use super::domain::{Bonus, DateRange, ManagerId, SalaryView};
use super::engine::{manager_not_found, store_failure};
use super::service::CompensationError;
use super::store::RecordStore;

/// Derives salary and bonus history from the manager record and the bonus ledger.
pub struct CompensationAggregator<S> {
    store: Arc<S>,
}

impl<S> CompensationAggregator<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Base salary plus every bonus ever accrued, with no date bound.
    pub fn salary(&self, manager_id: ManagerId) -> Result<SalaryView, CompensationError> {
        let manager = self
            .store
            .fetch_manager(manager_id)
            .map_err(store_failure("fetch manager", manager_id))?
            .ok_or_else(|| manager_not_found(manager_id))?;

        let bonuses = self
            .store
            .bonuses(&|bonus: &Bonus| bonus.manager_id == manager_id)
            .map_err(store_failure("load bonuses", manager_id))?;

        let accrued: u64 = bonuses
            .iter()
            .map(|bonus| u64::from(bonus.category.amount()))
            .sum();
        debug!(manager_id = manager_id.0, bonuses = bonuses.len(), accrued, "salary derived");

        Ok(SalaryView {
            id: manager_id,
            salary: u64::from(manager.base_salary) + accrued,
        })
    }

    /// Bonuses created inside `range`, optionally restricted to one manager, ordered
    /// by creation date. An empty result is reported as `NotFound`.
    pub fn bonus_history(
        &self,
        manager_id: Option<ManagerId>,
        range: DateRange,
    ) -> Result<Vec<Bonus>, CompensationError> {
        let entity = manager_id.map_or_else(|| "all managers".to_string(), |id| id.to_string());
        let mut bonuses = self
            .store
            .bonuses(&|bonus: &Bonus| {
                range.contains(bonus.creation_date)
                    && manager_id.map_or(true, |id| bonus.manager_id == id)
            })
            .map_err(store_failure("load bonus history", entity))?;

        if bonuses.is_empty() {
            return Err(CompensationError::NotFound("No bonuses found.".to_string()));
        }

        bonuses.sort_by_key(|bonus| (bonus.creation_date, bonus.id));
        Ok(bonuses)
    }
}
