//! Integration tests for the remote store adapter.
//!
//! These run against a real Redis instance via testcontainers and are
//! ignored by default; run them with `cargo test -- --ignored` on a
//! machine with Docker available.

use tagcache_redis::{RedisConfig, RemoteStore};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

// Shared Redis container for all tests
static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

async fn get_redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");

            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            let url = format!("redis://127.0.0.1:{}", host_port);

            (container, url)
        })
        .await;

    url.clone()
}

async fn store() -> RemoteStore {
    let config = RedisConfig::new(get_redis_url().await).with_pool_size(4);
    RemoteStore::connect(&config).expect("connect to containerized redis")
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn set_get_round_trip() {
    let store = store().await;

    store
        .set_with_expiry("it:roundtrip", b"payload", 60)
        .await
        .expect("set");

    let value = store.get("it:roundtrip").await.expect("get");
    assert_eq!(value, Some(b"payload".to_vec()));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn server_side_expiry_applies() {
    let store = store().await;

    store
        .set_with_expiry("it:expiring", b"value", 1)
        .await
        .expect("set");
    assert!(store.exists("it:expiring").await.expect("exists"));

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert!(!store.exists("it:expiring").await.expect("exists"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn del_reports_removed_count() {
    let store = store().await;

    store
        .set_with_expiry("it:del-1", b"1", 60)
        .await
        .expect("set");
    store
        .set_with_expiry("it:del-2", b"2", 60)
        .await
        .expect("set");

    let removed = store
        .del(&[
            "it:del-1".to_string(),
            "it:del-2".to_string(),
            "it:del-missing".to_string(),
        ])
        .await
        .expect("del");
    assert_eq!(removed, 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn diagnostics_commands_answer() {
    let store = store().await;

    store.ping().await.expect("ping");
    assert!(store.info().await.expect("info").contains("used_memory"));
    store.dbsize().await.expect("dbsize");
}
