use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;

use super::domain::{
    Bonus, BonusId, CallsRecordId, Manager, ManagerId, NewManager, NewPremium, Premium, PremiumId,
    ProcessedCallsRecord,
};
use super::store::{CallProcessingBatch, RecordStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    managers: BTreeMap<ManagerId, Manager>,
    bonuses: BTreeMap<BonusId, Bonus>,
    calls: BTreeMap<CallsRecordId, ProcessedCallsRecord>,
    premiums: BTreeMap<PremiumId, Premium>,
    // High-water marks. Never lowered, so a deleted id is never handed out again.
    next_manager: u32,
    next_premium: u32,
    next_bonus: u64,
    next_calls: u64,
}

impl Tables {
    fn assign_manager_id(
        &mut self,
        requested: Option<ManagerId>,
    ) -> Result<ManagerId, StoreError> {
        let id = match requested {
            Some(id) if self.managers.contains_key(&id) => return Err(StoreError::Conflict),
            Some(id) => id,
            None => ManagerId(advance(self.next_manager, "manager")?),
        };
        self.next_manager = self.next_manager.max(id.0);
        Ok(id)
    }

    fn assign_premium_id(
        &mut self,
        requested: Option<PremiumId>,
    ) -> Result<PremiumId, StoreError> {
        let id = match requested {
            Some(id) if self.premiums.contains_key(&id) => return Err(StoreError::Conflict),
            Some(id) => id,
            None => PremiumId(advance(self.next_premium, "premium")?),
        };
        self.next_premium = self.next_premium.max(id.0);
        Ok(id)
    }
}

fn advance(high_water: u32, kind: &str) -> Result<u32, StoreError> {
    high_water
        .checked_add(1)
        .ok_or_else(|| StoreError::Unavailable(format!("{kind} ids exhausted")))
}

/// Process-local record store. Every write, including call processing batches, is
/// applied under a single lock so readers never observe a partial commit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert_manager(&self, draft: NewManager) -> Result<Manager, StoreError> {
        let mut tables = self.tables()?;
        let id = tables.assign_manager_id(draft.id)?;
        let manager = Manager {
            id,
            name: draft.name,
            base_salary: draft.base_salary,
        };
        tables.managers.insert(id, manager.clone());
        Ok(manager)
    }

    fn fetch_manager(&self, id: ManagerId) -> Result<Option<Manager>, StoreError> {
        Ok(self.tables()?.managers.get(&id).cloned())
    }

    fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        Ok(self.tables()?.managers.values().cloned().collect())
    }

    fn update_manager(&self, manager: Manager) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        match tables.managers.get_mut(&manager.id) {
            Some(slot) => {
                *slot = manager;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_manager(&self, id: ManagerId) -> Result<(), StoreError> {
        self.tables()?
            .managers
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn bonuses(&self, predicate: &dyn Fn(&Bonus) -> bool) -> Result<Vec<Bonus>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .bonuses
            .values()
            .filter(|bonus| predicate(bonus))
            .cloned()
            .collect())
    }

    fn processed_calls(
        &self,
        predicate: &dyn Fn(&ProcessedCallsRecord) -> bool,
    ) -> Result<Vec<ProcessedCallsRecord>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .calls
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }

    fn commit_call_processing(&self, batch: CallProcessingBatch) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if !tables.managers.contains_key(&batch.manager_id) {
            return Err(StoreError::NotFound);
        }

        let CallProcessingBatch { bonuses, calls, .. } = batch;

        // Validate the counter row before touching the ledger.
        let calls_id = match calls.id {
            Some(id) => {
                let existing = tables.calls.get(&id).ok_or(StoreError::NotFound)?;
                if existing.manager_id != calls.manager_id || existing.date != calls.date {
                    return Err(StoreError::Conflict);
                }
                id
            }
            None => {
                tables.next_calls += 1;
                CallsRecordId(tables.next_calls)
            }
        };

        for bonus in bonuses {
            tables.next_bonus += 1;
            let id = BonusId(tables.next_bonus);
            tables.bonuses.insert(
                id,
                Bonus {
                    id,
                    manager_id: bonus.manager_id,
                    category: bonus.category,
                    creation_date: bonus.creation_date,
                },
            );
        }

        tables.calls.insert(
            calls_id,
            ProcessedCallsRecord {
                id: calls_id,
                manager_id: calls.manager_id,
                date: calls.date,
                count: calls.count,
            },
        );
        Ok(())
    }

    fn insert_premium(&self, premium: NewPremium) -> Result<Premium, StoreError> {
        let mut tables = self.tables()?;
        let id = tables.assign_premium_id(premium.id)?;
        let stored = Premium {
            id,
            manager_id: premium.manager_id,
            creation_date: premium
                .creation_date
                .unwrap_or_else(|| Local::now().date_naive()),
            volume: premium.volume,
        };
        tables.premiums.insert(id, stored.clone());
        Ok(stored)
    }

    fn fetch_premium(&self, id: PremiumId) -> Result<Option<Premium>, StoreError> {
        Ok(self.tables()?.premiums.get(&id).cloned())
    }

    fn premiums(&self, manager_id: Option<ManagerId>) -> Result<Vec<Premium>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .premiums
            .values()
            .filter(|premium| manager_id.map_or(true, |id| premium.manager_id == id))
            .cloned()
            .collect())
    }

    fn update_premium(&self, premium: Premium) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        match tables.premiums.get_mut(&premium.id) {
            Some(slot) => {
                *slot = premium;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_premium(&self, id: PremiumId) -> Result<(), StoreError> {
        self.tables()?
            .premiums
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
