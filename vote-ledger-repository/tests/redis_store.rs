//! Tests against a live Redis server.
//!
//! Run with `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`. Each test
//! works in its own key namespace and cleans up after itself.

use std::sync::Arc;

use vote_ledger_repository::{
    AtomicBatch, KeyValueStore, LedgerConfig, LedgerError, LedgerKeys, RedisStore,
    RedisStoreConfig, VoteLedgerService,
};

async fn connect() -> RedisStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    RedisStore::new(&RedisStoreConfig::new(url))
        .await
        .expect("Redis must be reachable for ignored tests")
}

fn namespace(test: &str) -> String {
    format!("vote-ledger-test:{}:{}", test, std::process::id())
}

#[tokio::test]
#[ignore]
async fn test_ping() {
    let store = connect().await;
    store.ping().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_atomic_batch_replies() {
    let store = connect().await;
    let ns = namespace("batch");
    let zset = format!("{}:z", ns);
    let set = format!("{}:s", ns);

    let mut batch = AtomicBatch::new();
    batch
        .sorted_set_add(&zset, "a", 0.0)
        .sorted_set_increment(&zset, "a", 2.0)
        .set_add(&set, "u1");
    let summary = store.execute_atomic(&batch).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(summary.results[1].reply, Some(2));
    assert_eq!(store.sorted_set_score(&zset, "a").await.unwrap(), Some(2.0));

    store.delete_keys(&[zset, set]).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_ledger_round_trip_and_reset() {
    let store: Arc<dyn KeyValueStore> = Arc::new(connect().await);
    let config = LedgerConfig::with_keys(LedgerKeys::namespaced(&namespace("ledger")))
        .scan_count(10)
        .delete_batch_size(2);
    let service = VoteLedgerService::with_config(store, config);

    let a = service.add_item("A", "first").await.unwrap();
    let b = service.add_item("B", "second").await.unwrap();
    service.cast_or_switch_vote(&a, "u1").await.unwrap();
    service.cast_or_switch_vote(&b, "u1").await.unwrap();
    service.cast_or_switch_vote(&b, "u2").await.unwrap();

    let ranking = service.list_ranked().await.unwrap();
    assert_eq!(ranking.total_vote, 2);
    assert_eq!(ranking.items[0].item_id, b);
    assert_eq!(ranking.items[0].vote_count, 2);

    let summary = service.reset_all().await.unwrap();
    assert!(summary.all_deleted);
    // the set for A emptied on the switch and no longer exists
    assert_eq!(summary.membership_keys_removed, 1);

    assert!(matches!(
        service.cast_or_switch_vote(&a, "u1").await,
        Err(LedgerError::ItemNotFound(_))
    ));
}
