//! Cache identity across threads: for any (kind, id) pair there is at most
//! one live proxy instance in the process, even under a registration race.

use std::{
    sync::{Arc, Barrier},
    thread,
    time::Duration,
};

use tether_client::{CheckItem, Member};
use tether_shared::EntityId;
use tether_test::{registry_with, ScriptedRemote};

#[test]
fn concurrent_find_or_create_returns_one_instance() {
    let remote = Arc::new(ScriptedRemote::new());
    let registry = Arc::new(registry_with(remote, Duration::from_secs(60)));
    let id = EntityId::from("ci1");

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let id = id.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                CheckItem::find_or_create(&registry, &id).unwrap()
            })
        })
        .collect();

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for pair in instances.windows(2) {
        assert!(
            Arc::ptr_eq(&pair[0], &pair[1]),
            "every thread must observe the identical cached instance"
        );
    }
    assert_eq!(registry.cache().len(), 1);
}

#[test]
fn kinds_do_not_collide_on_the_same_id() {
    let remote = Arc::new(ScriptedRemote::new());
    let registry = registry_with(remote, Duration::from_secs(60));
    let id = EntityId::from("shared-id");

    let item = CheckItem::find_or_create(&registry, &id).unwrap();
    let member = Member::find_or_create(&registry, &id).unwrap();

    assert_eq!(registry.cache().len(), 2);
    assert_eq!(item.id(), member.id());
}

#[test]
fn delete_then_recreate_yields_a_fresh_instance() {
    let remote = Arc::new(ScriptedRemote::new());
    remote.seed("checkItem", "ci1", &[]);
    let registry = registry_with(remote.clone(), Duration::from_secs(60));
    let id = EntityId::from("ci1");

    let first = CheckItem::find_or_create(&registry, &id).unwrap();
    first.delete().unwrap();
    assert_eq!(remote.delete_calls(), 1);
    assert_eq!(registry.cache().len(), 0);

    let second = CheckItem::find_or_create(&registry, &id).unwrap();
    assert!(
        !Arc::ptr_eq(&first, &second),
        "a deleted entity must not be resurrected from the cache"
    );
}
