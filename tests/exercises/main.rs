//! Integration tests for ExerciseStore against the in-memory document store.

mod support;

use std::thread;

use fitness_journal::{
    DocumentStore, ExerciseError, ExerciseForm, Fields, StoreOperation,
};
use serde_json::Value;
use support::{new_store, record};

#[test]
fn create_update_fetch_preserves_set_order() {
    let store = new_store();
    let id = store
        .create("Bench Press", &["80", "85", "80", "bad", "-2"])
        .wait()
        .unwrap();

    let created = store.fetch_one(&id).wait().unwrap();
    assert_eq!(created.weights, vec![80, 85, 80, 0, -2]);

    // Seed an edit form, change one set, submit.
    let mut form = ExerciseForm::edit(&created);
    assert_eq!(form.weights(), &["80", "85", "80", "0", "-2"]);
    form.set_weight(1, "87");
    form.set_name("Bench");
    assert_eq!(form.submit(&store).wait().unwrap(), id);

    let updated = store.fetch_one(&id).wait().unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Bench");
    assert_eq!(updated.weights, vec![80, 87, 80, 0, -2]);
}

#[test]
fn update_of_missing_id_creates_nothing() {
    let store = new_store();
    let err = store.update("no-such-id", "Row", &["50"]).wait().unwrap_err();

    assert!(err.is_not_found());
    assert!(store.list().wait().unwrap().is_empty());
    assert!(store.fetch_one("no-such-id").wait().unwrap_err().is_not_found());
}

#[test]
fn delete_then_fetch_is_not_found() {
    let store = new_store();
    let id = store.create("Dip", &["0"]).wait().unwrap();

    assert_eq!(store.delete(&id).wait(), Ok(()));
    assert!(store.fetch_one(&id).wait().unwrap_err().is_not_found());
    assert_eq!(store.delete(&id).wait(), Ok(()));
}

#[test]
fn notifications_track_create_update_delete() {
    let store = new_store();
    let (_subscription, recorder) = record(&store);
    assert!(recorder.next().is_empty());

    let id = store.create("Squat", &["100", "110"]).wait().unwrap();
    let after_create = recorder.next();
    assert_eq!(after_create.len(), 1);
    assert_eq!(after_create[0].id, id);

    let other = store.create("Lunge", &["20"]).wait().unwrap();
    assert_eq!(recorder.next().len(), 2);

    store.update(&id, "Front Squat", &["90"]).wait().unwrap();
    let after_update = recorder.next();
    assert_eq!(after_update.len(), 2);
    let squat = after_update.iter().find(|r| r.id == id).unwrap();
    assert_eq!(squat.name, "Front Squat");
    assert_eq!(squat.weights, vec![90]);

    store.delete(&other).wait().unwrap();
    let after_delete = recorder.next();
    assert_eq!(after_delete.len(), 1);
    assert_eq!(store.records(), after_delete);
}

#[test]
fn deleting_a_missing_id_sends_no_notification() {
    let store = new_store();
    let (_subscription, recorder) = record(&store);
    recorder.next();

    store.delete("never-existed").wait().unwrap();
    assert!(recorder.is_quiet());
}

#[test]
fn burst_of_writes_never_goes_backwards() {
    let store = new_store();
    let (_subscription, recorder) = record(&store);
    recorder.next();

    let pending: Vec<_> = (0..10)
        .map(|i| store.create(&format!("Set {}", i), &[i.to_string()]))
        .collect();
    for p in pending {
        p.wait().unwrap();
    }

    let seen = recorder.drain();
    assert!(!seen.is_empty());
    for pair in seen.windows(2) {
        assert!(pair[0].len() < pair[1].len());
    }
    assert_eq!(seen.last().unwrap().len(), 10);
    assert_eq!(store.records().len(), 10);
}

#[test]
fn listener_error_keeps_previous_snapshot() {
    let store = new_store();
    store.create("Pull-up", &["0", "5"]).wait().unwrap();

    let (_subscription, recorder) = record(&store);
    let before = recorder.next();
    assert_eq!(before.len(), 1);

    store
        .client()
        .broadcast_error("exercises", "PERMISSION_DENIED")
        .unwrap();

    let err = recorder.next_error();
    assert_eq!(err, ExerciseError::Subscription("PERMISSION_DENIED".into()));
    assert_eq!(store.records(), before);
    assert!(recorder.is_quiet());
}

#[test]
fn malformed_document_is_reported_and_cache_kept() {
    let store = new_store();
    let (_subscription, recorder) = record(&store);
    recorder.next();

    store.create("Press", &["40"]).wait().unwrap();
    let good = recorder.next();

    let mut fields = Fields::new();
    fields.insert("name".into(), Value::from(42));
    let bad_id = store
        .client()
        .add_document("exercises", fields)
        .unwrap();

    match recorder.next_error() {
        ExerciseError::Malformed { id, .. } => assert_eq!(id, bad_id),
        other => panic!("expected Malformed, got {:?}", other),
    }
    assert_eq!(store.records(), good);
}

#[test]
fn transport_failures_are_surfaced_and_not_retried() {
    let store = new_store();
    let id = store.create("Curl", &["12"]).wait().unwrap();

    store.client().fail_next(StoreOperation::Update, "DEADLINE_EXCEEDED");
    let err = store.update(&id, "Hammer Curl", &["14"]).wait().unwrap_err();
    assert_eq!(err, ExerciseError::Transport("DEADLINE_EXCEEDED".into()));
    assert_eq!(store.fetch_one(&id).wait().unwrap().name, "Curl");

    store.client().fail_next(StoreOperation::Get, "UNAVAILABLE");
    assert_eq!(
        store.fetch_one(&id).wait().unwrap_err(),
        ExerciseError::Transport("UNAVAILABLE".into())
    );

    store.client().fail_next(StoreOperation::Delete, "UNAVAILABLE");
    assert!(store.delete(&id).wait().is_err());
    assert!(store.fetch_one(&id).wait().is_ok());
}

#[test]
fn unsubscribe_releases_the_watch() {
    let store = new_store();
    let (subscription, recorder) = record(&store);
    recorder.next();
    assert_eq!(store.client().watcher_count("exercises"), 1);

    subscription.unsubscribe();
    assert_eq!(store.client().watcher_count("exercises"), 0);

    store.create("Plank", &[] as &[&str]).wait().unwrap();
    assert!(recorder.is_quiet());
}

#[test]
fn subscription_released_on_early_teardown() {
    let store = new_store();

    let result = thread::scope(|scope| {
        scope
            .spawn(|| {
                let (_subscription, recorder) = record(&store);
                recorder.next();
                panic!("screen torn down");
            })
            .join()
    });

    assert!(result.is_err());
    assert_eq!(store.client().watcher_count("exercises"), 0);
}

#[test]
fn concurrent_updates_settle_on_one_writer() {
    let store = new_store();
    let (_subscription, recorder) = record(&store);
    recorder.next();

    let id = store.create("Row", &["50"]).wait().unwrap();
    recorder.next();

    let a = store.update(&id, "Row A", &["60"]);
    let b = store.update(&id, "Row B", &["70"]);
    a.wait().unwrap();
    b.wait().unwrap();

    let last = recorder.drain().pop().unwrap();
    let stored = store.fetch_one(&id).wait().unwrap();
    assert_eq!(last, vec![stored.clone()]);
    assert_eq!(store.records(), vec![stored]);
}

#[test]
fn two_subscribers_both_get_the_initial_snapshot() {
    let store = new_store();
    store.create("Burpee", &["0"]).wait().unwrap();

    let (_first, first) = record(&store);
    let (_second, second) = record(&store);

    assert_eq!(first.next().len(), 1);
    assert_eq!(second.next().len(), 1);
}
