use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::context::PlanningContext;
use crate::repository::traits::ActionLogStore;
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::ensure_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_log(wave_id: i64, action_type: ActionType) -> ActionLog {
    let ctx = PlanningContext::new(1, "planner");
    ActionLog::new(
        &ctx,
        Some(wave_id),
        action_type,
        Some(json!({ "client_percent": 20.0 })),
        Some("Test log".to_string()),
    )
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log(3, ActionType::DiscountSave);
    let id = repo.insert(&log).unwrap();
    assert_eq!(id, log.action_id);

    let found = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(found.campaign_id, Some(1));
    assert_eq!(found.wave_id, Some(3));
    assert_eq!(found.action_type, "DiscountSave");
    assert_eq!(found.actor, "planner");
    assert_eq!(found.payload_json, Some(json!({ "client_percent": 20.0 })));

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_find_by_wave_and_type() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log(1, ActionType::DiscountSave)).unwrap();
    repo.insert(&make_test_log(1, ActionType::TrpRedistribute)).unwrap();
    repo.insert(&make_test_log(2, ActionType::TrpRedistribute)).unwrap();

    assert_eq!(repo.find_by_wave_id(1, 10).unwrap().len(), 2);
    assert_eq!(repo.count_by_wave(2).unwrap(), 1);
    assert_eq!(repo.find_by_campaign_id(1, 10).unwrap().len(), 3);
    assert_eq!(
        repo.find_by_action_type("TrpRedistribute", 10).unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_append_via_store_trait() {
    let repo = ActionLogRepository::new(setup_test_db());
    let store: &dyn ActionLogStore = &repo;

    store
        .append(&make_test_log(5, ActionType::TrpClear))
        .await
        .unwrap();

    assert_eq!(repo.count_by_wave(5).unwrap(), 1);
}
