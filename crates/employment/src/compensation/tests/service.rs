use super::common::*;
use crate::compensation::domain::{
    ManagerChanges, ManagerId, NewManager, NewPremium, PremiumChanges, PremiumId,
};
use crate::compensation::{CompensationError, CompensationService, MonthWindow};
use std::sync::Arc;

#[test]
fn create_then_fetch_round_trips_every_field() {
    let (service, _) = build_service();
    let created = seed_manager(&service, 42, 1_500);

    let fetched = service.get_manager(ManagerId(42)).expect("manager present");
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Manager 42");
    assert_eq!(fetched.base_salary, 1_500);
}

#[test]
fn create_assigns_ids_when_none_supplied() {
    let (service, _) = build_service();
    seed_manager(&service, 3, 0);

    let assigned = service
        .create_manager(NewManager {
            id: None,
            name: "  Lin  ".to_string(),
            base_salary: 10,
        })
        .expect("created");
    assert_eq!(assigned.id, ManagerId(4));
    assert_eq!(assigned.name, "Lin");
}

#[test]
fn recreated_manager_does_not_inherit_a_deleted_ledger() {
    let (service, _) = build_service();
    let draft = |name: &str, base_salary| NewManager {
        id: None,
        name: name.to_string(),
        base_salary,
    };

    let departed = service.create_manager(draft("Departed", 1_000)).expect("created");
    service
        .apply_call_processing(departed.id, 3, Some(date(2024, 3, 1)))
        .expect("calls processed");
    service.delete_manager(departed.id).expect("deleted");

    let fresh = service.create_manager(draft("Fresh", 500)).expect("created");
    assert_ne!(fresh.id, departed.id);
    assert_eq!(service.salary(fresh.id).expect("salary").salary, 500);
}

#[test]
fn exhausted_ids_surface_as_store_failures() {
    let (service, _) = build_service();
    seed_manager(&service, u32::MAX, 0);

    let result = service.create_manager(NewManager {
        id: None,
        name: "Overflow".to_string(),
        base_salary: 0,
    });
    assert!(matches!(result, Err(CompensationError::Store { .. })));
    assert!(service.get_manager(ManagerId(u32::MAX)).is_ok());
}

#[test]
fn duplicate_ids_conflict() {
    let (service, _) = build_service();
    seed_manager(&service, 7, 1_000);

    match service.create_manager(NewManager {
        id: Some(ManagerId(7)),
        name: "Again".to_string(),
        base_salary: 0,
    }) {
        Err(CompensationError::Conflict(message)) => {
            assert_eq!(message, "Manager with id 7 already exists.")
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn blank_names_are_invalid() {
    let (service, _) = build_service();
    assert!(matches!(
        service.create_manager(NewManager {
            id: None,
            name: "   ".to_string(),
            base_salary: 0,
        }),
        Err(CompensationError::InvalidInput(_))
    ));

    seed_manager(&service, 1, 0);
    assert!(matches!(
        service.update_manager(
            ManagerId(1),
            ManagerChanges {
                name: String::new(),
                base_salary: 5,
            }
        ),
        Err(CompensationError::InvalidInput(_))
    ));
}

#[test]
fn update_and_delete_require_existing_managers() {
    let (service, _) = build_service();
    let changes = ManagerChanges {
        name: "Nobody".to_string(),
        base_salary: 1,
    };
    assert!(matches!(
        service.update_manager(ManagerId(9), changes),
        Err(CompensationError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_manager(ManagerId(9)),
        Err(CompensationError::NotFound(_))
    ));
}

#[test]
fn delete_then_fetch_is_not_found() {
    let (service, _) = build_service();
    seed_manager(&service, 5, 100);

    service.delete_manager(ManagerId(5)).expect("deleted");
    match service.get_manager(ManagerId(5)) {
        Err(CompensationError::NotFound(message)) => {
            assert_eq!(message, "Manager with id 5 not found.")
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn list_managers_reports_empty_store_as_not_found() {
    let (service, _) = build_service();
    assert!(matches!(
        service.list_managers(),
        Err(CompensationError::NotFound(_))
    ));

    seed_manager(&service, 2, 0);
    seed_manager(&service, 1, 0);
    let ids: Vec<_> = service
        .list_managers()
        .expect("managers")
        .into_iter()
        .map(|manager| manager.id)
        .collect();
    assert_eq!(ids, vec![ManagerId(1), ManagerId(2)]);
}

#[test]
fn premiums_support_full_crud() {
    let (service, _) = build_service();

    let created = service
        .create_premium(NewPremium {
            id: None,
            manager_id: ManagerId(1),
            creation_date: Some(date(2024, 2, 14)),
            volume: 250,
        })
        .expect("premium created");
    assert_eq!(created.id, PremiumId(1));
    assert_eq!(service.get_premium(created.id).expect("premium"), created);

    let updated = service
        .update_premium(
            created.id,
            PremiumChanges {
                manager_id: ManagerId(2),
                volume: 400,
            },
        )
        .expect("updated");
    assert_eq!(updated.manager_id, ManagerId(2));
    assert_eq!(updated.volume, 400);
    assert_eq!(updated.creation_date, date(2024, 2, 14));

    assert_eq!(
        service
            .list_premiums(Some(ManagerId(2)))
            .expect("premiums")
            .len(),
        1
    );
    match service.list_premiums(Some(ManagerId(1))) {
        Err(CompensationError::NotFound(message)) => {
            assert_eq!(message, "No premiums found for employee with id 1.")
        }
        other => panic!("expected not found, got {other:?}"),
    }

    service.delete_premium(created.id).expect("deleted");
    assert!(matches!(
        service.get_premium(created.id),
        Err(CompensationError::NotFound(_))
    ));
    assert!(matches!(
        service.list_premiums(None),
        Err(CompensationError::NotFound(_))
    ));
}

#[test]
fn premiums_do_not_touch_salary_and_validate_volume() {
    let (service, _) = build_service();
    seed_manager(&service, 1, 900);

    service
        .create_premium(NewPremium {
            id: Some(PremiumId(3)),
            manager_id: ManagerId(1),
            creation_date: None,
            volume: 50,
        })
        .expect("premium created");
    assert_eq!(service.salary(ManagerId(1)).expect("salary").salary, 900);

    assert!(matches!(
        service.create_premium(NewPremium {
            id: Some(PremiumId(3)),
            manager_id: ManagerId(1),
            creation_date: None,
            volume: 10,
        }),
        Err(CompensationError::Conflict(_))
    ));
    assert!(matches!(
        service.create_premium(NewPremium {
            id: None,
            manager_id: ManagerId(1),
            creation_date: None,
            volume: 0,
        }),
        Err(CompensationError::InvalidInput(_))
    ));
}

#[test]
fn store_outages_surface_as_store_failures() {
    let service = CompensationService::new(
        Arc::new(UnavailableStore),
        config(MonthWindow::CalendarMonth),
    );

    assert!(matches!(
        service.list_managers(),
        Err(CompensationError::Store { operation: "list managers", .. })
    ));
    assert!(matches!(
        service.apply_call_processing(ManagerId(1), 1, Some(date(2024, 1, 1))),
        Err(CompensationError::Store { operation: "fetch manager", .. })
    ));
    assert_eq!(service.config().month_window, MonthWindow::CalendarMonth);
}
