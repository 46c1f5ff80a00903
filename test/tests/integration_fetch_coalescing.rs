//! Fetch coalescing: concurrent stale readers share one in-flight fetch and
//! observe its result, success or failure.

use std::{
    sync::{Arc, Barrier},
    thread,
    time::Duration,
};

use serde_json::json;

use tether_client::CheckItem;
use tether_shared::{EntityId, FieldError, SyncError};
use tether_test::{registry_with, ScriptedRemote};

#[test]
fn ten_stale_readers_share_one_fetch() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = Arc::new(ScriptedRemote::new());
    remote.seed("checkItem", "ci1", &[("name", json!("A")), ("pos", json!(1))]);
    remote.set_fetch_delay(Duration::from_millis(50));
    let registry = registry_with(remote.clone(), Duration::from_secs(60));
    let item = CheckItem::find_or_create(&registry, &EntityId::from("ci1")).unwrap();

    let barrier = Arc::new(Barrier::new(10));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let item = item.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                item.name()
            })
        })
        .collect();

    for handle in handles {
        let name = handle.join().unwrap().unwrap();
        assert_eq!(
            name,
            Some("A".to_string()),
            "every caller must observe the coalesced fetch's snapshot"
        );
    }
    assert_eq!(remote.fetch_calls(), 1);
}

#[test]
fn coalesced_readers_all_see_the_failure() {
    let remote = Arc::new(ScriptedRemote::new());
    remote.seed("checkItem", "ci1", &[("name", json!("A"))]);
    remote.set_fetch_delay(Duration::from_millis(50));
    remote.fail_fetches(true);
    let registry = registry_with(remote.clone(), Duration::from_secs(60));
    let item = CheckItem::find_or_create(&registry, &EntityId::from("ci1")).unwrap();

    let barrier = Arc::new(Barrier::new(10));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let item = item.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                item.name()
            })
        })
        .collect();

    for handle in handles {
        match handle.join().unwrap() {
            Err(FieldError::Sync(SyncError::FetchFailed(_))) => {}
            other => panic!("expected the coalesced fetch failure, got {other:?}"),
        }
    }
    assert_eq!(remote.fetch_calls(), 1);

    // the snapshot was never touched; recovery is a plain re-attempt
    remote.fail_fetches(false);
    assert_eq!(item.name().unwrap(), Some("A".to_string()));
}
