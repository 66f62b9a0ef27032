use chrono::{Duration, TimeZone, Utc};
use graphwise_persist::{InMemorySessionStore, PersistError, SessionStore, StoreBuilder};
use graphwise_types::{GraphDocument, GraphLink, GraphNode};

fn graph(ids: &[&str]) -> GraphDocument {
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(i, id)| GraphNode::new(*id, id.to_uppercase()).with_group(i as u32))
        .collect();
    let links = ids
        .windows(2)
        .map(|pair| GraphLink::new(pair[0], pair[1]))
        .collect();
    GraphDocument::new(nodes, links)
}

#[tokio::test]
async fn test_insert_then_update_graph() {
    let store = InMemorySessionStore::new();
    let created_at = Utc.with_ymd_and_hms(2024, 11, 2, 10, 0, 0).unwrap();

    let record = store
        .insert("user-1", "stoicism", "A school of philosophy.", &graph(&["root"]), created_at)
        .await
        .unwrap();
    assert_eq!(record.graph_data["nodes"][0]["id"], "root");

    store
        .update("user-1", created_at, &graph(&["root", "virtue"]))
        .await
        .unwrap();

    let history = store.query_history("user-1", None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].graph_data["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(history[0].generated_summary, "A school of philosophy.");
    assert_eq!(history[0].created_at, created_at);
}

#[tokio::test]
async fn test_update_unknown_session_fails() {
    let store = InMemorySessionStore::new();

    let err = store
        .update("user-1", Utc::now(), &graph(&["root"]))
        .await
        .unwrap_err();

    assert!(matches!(err, PersistError::SessionNotFound { .. }));
}

#[tokio::test]
async fn test_history_is_newest_first_and_per_user() {
    let store = InMemorySessionStore::new();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for (offset, prompt) in [(0, "first"), (2, "third"), (1, "second")] {
        store
            .insert("alice", prompt, "", &graph(&["root"]), base + Duration::hours(offset))
            .await
            .unwrap();
    }
    store
        .insert("bob", "other", "", &graph(&["root"]), base)
        .await
        .unwrap();

    let history = store.query_history("alice", None).await.unwrap();
    let prompts: Vec<_> = history.iter().map(|r| r.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["third", "second", "first"]);

    let limited = store.query_history("alice", Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(store.len().await, 4);
}

#[tokio::test]
async fn test_update_summary() {
    let store = InMemorySessionStore::new();
    let created_at = Utc::now();
    store
        .insert("u", "topic", "old", &graph(&["root"]), created_at)
        .await
        .unwrap();

    store.update_summary("u", created_at, "new").await.unwrap();

    let history = store.query_history("u", None).await.unwrap();
    assert_eq!(history[0].generated_summary, "new");
}

#[tokio::test]
async fn test_builder_defaults_to_memory() {
    let store = StoreBuilder::new().build().await.unwrap();
    assert!(store.query_history("nobody", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_builder_rejects_unknown_scheme() {
    let result = StoreBuilder::new().uri("postgres://localhost").build().await;
    assert!(matches!(result, Err(PersistError::Internal(_))));
}
