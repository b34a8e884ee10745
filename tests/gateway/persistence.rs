use crate::gateway_harness::{GatewayTestServer, USER_ID, model_fails, quest_request};
use reqwest::StatusCode;
use ruach_compass::config::StoreBackend;
use ruach_compass::store::{
    DAILY_STATE_KIND, QUEST_SET_KIND, RecordKey, RecordStore, SqliteRecordStore,
};
use serde_json::json;
use wiremock::MockServer;

#[tokio::test]
async fn authenticated_results_land_in_sqlite() {
    let model = MockServer::start().await;
    model_fails(&model, 503).await;
    let mut server = GatewayTestServer::start(&model, |config| {
        config.store.backend = StoreBackend::Sqlite;
    })
    .await;
    let db_path = server.workspace.path().join("records.db");

    let response = server.post_as_user("/ai/quests", &quest_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = server
        .post_as_user("/ai/script", &json!({"scenarioType": "testing"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    server.stop().await;

    let store = SqliteRecordStore::open(&db_path)
        .await
        .expect("records.db should reopen");

    let daily = store
        .select(&RecordKey::today(USER_ID, DAILY_STATE_KIND))
        .await
        .expect("select should succeed")
        .expect("daily state should be stored");
    assert_eq!(daily.payload["focus"], "creation");

    let quests = store
        .select(&RecordKey::today(USER_ID, QUEST_SET_KIND))
        .await
        .expect("select should succeed")
        .expect("quest set should be stored");
    assert!(quests.payload["quests"].as_array().is_some_and(|q| !q.is_empty()));

    let scripts = store
        .select(&RecordKey::today(USER_ID, "scripts:testing"))
        .await
        .expect("select should succeed");
    assert!(scripts.is_some());
}

#[tokio::test]
async fn device_callers_are_served_but_not_stored() {
    let model = MockServer::start().await;
    model_fails(&model, 503).await;
    let mut server = GatewayTestServer::start(&model, |config| {
        config.store.backend = StoreBackend::Sqlite;
    })
    .await;
    let db_path = server.workspace.path().join("records.db");

    let response = server.post("/ai/quests", "phone-9", &quest_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    server.stop().await;

    let store = SqliteRecordStore::open(&db_path)
        .await
        .expect("records.db should reopen");
    let stored = store
        .select(&RecordKey::today("phone-9", DAILY_STATE_KIND))
        .await
        .expect("select should succeed");
    assert!(stored.is_none());
}
