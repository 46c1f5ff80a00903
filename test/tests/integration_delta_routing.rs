//! External delta routing: applied events and pushed notifications reach a
//! cached instance through the registry, and are dropped when no instance
//! (or no kind) exists to receive them.

use std::{sync::Arc, sync::Mutex, time::Duration};

use serde_json::json;

use tether_client::{CheckItem, Member};
use tether_shared::{CachedEntity, EntityId};
use tether_test::{raw, registry_with, ScriptedRemote};

#[test]
fn delta_reaches_the_cached_instance() {
    let remote = Arc::new(ScriptedRemote::new());
    remote.seed(
        "member",
        "m1",
        &[("fullName", json!("Greg Dennis")), ("bio", json!("maintainer"))],
    );
    let registry = registry_with(remote.clone(), Duration::from_secs(60));
    let member = Member::find_or_create(&registry, &EntityId::from("m1")).unwrap();
    member.refresh().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    member.on_updated(move |changed| {
        sink.lock()
            .unwrap()
            .push(changed.iter().map(str::to_string).collect::<Vec<_>>());
    });

    registry.apply_delta("member", &EntityId::from("m1"), &raw(&[("bio", json!("emeritus"))]));

    assert_eq!(member.bio().unwrap(), Some("emeritus".to_string()));
    assert_eq!(
        member.full_name().unwrap(),
        Some("Greg Dennis".to_string()),
        "a partial update must not clear unmentioned properties"
    );
    assert_eq!(*seen.lock().unwrap(), vec![vec!["bio".to_string()]]);
    assert_eq!(remote.fetch_calls(), 1);
}

#[test]
fn delta_for_an_unknown_id_is_dropped() {
    let remote = Arc::new(ScriptedRemote::new());
    let registry = registry_with(remote, Duration::from_secs(60));

    registry.apply_delta(
        "member",
        &EntityId::from("never-seen"),
        &raw(&[("bio", json!("ghost"))]),
    );

    assert_eq!(
        registry.cache().len(),
        0,
        "an external update must not conjure an instance into the cache"
    );
}

#[test]
fn delta_for_an_unregistered_kind_is_dropped() {
    let remote = Arc::new(ScriptedRemote::new());
    let registry = registry_with(remote, Duration::from_secs(60));
    let item = CheckItem::find_or_create(&registry, &EntityId::from("ci1")).unwrap();

    registry.apply_delta("board", &EntityId::from("ci1"), &raw(&[("name", json!("X"))]));

    assert_eq!(
        item.context().property("name"),
        None,
        "a delta under an unregistered wire name must not reach any instance"
    );
}
