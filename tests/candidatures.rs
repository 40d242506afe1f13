use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use viewstore::{AppContext, Entity, EntityStore, JsonPatch, Patch, PatchError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Candidature {
    id: u64,
    company: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl Entity for Candidature {
    type Id = u64;
    fn id(&self) -> &u64 {
        &self.id
    }
}

impl Candidature {
    fn new(id: u64, company: &str) -> Self {
        Self {
            id,
            company: company.into(),
            status: "draft".into(),
            notes: None,
        }
    }
}

/// Typed patch for candidature updates. Present fields win, absent fields
/// keep the original value.
#[derive(Default)]
struct CandidatureChanges {
    status: Option<String>,
    notes: Option<String>,
}

impl Patch<Candidature> for CandidatureChanges {
    fn merge(&self, original: &Candidature) -> Result<Candidature, PatchError> {
        let mut updated = original.clone();
        if let Some(status) = &self.status {
            updated.status = status.clone();
        }
        if let Some(notes) = &self.notes {
            updated.notes = Some(notes.clone());
        }
        Ok(updated)
    }
}

#[test]
fn candidature_tracking_workflow() {
    tracing_subscriber::fmt()
        .with_env_filter("viewstore=debug")
        .try_init()
        .ok();

    let context = AppContext::new();
    context.register(EntityStore::<Candidature>::new());

    // A list view subscribes for the session and re-renders on every change.
    let store = context.store::<Candidature>().unwrap();
    let renders = Arc::new(AtomicUsize::new(0));
    let render_count = Arc::clone(&renders);
    let _list_view = store.subscribe(move |_| {
        render_count.fetch_add(1, Ordering::SeqCst);
    });

    // File two candidatures.
    store.append(Candidature::new(1, "Acme")).unwrap();
    store.append(Candidature::new(2, "Globex")).unwrap();
    assert_eq!(renders.load(Ordering::SeqCst), 2);

    // Submit the first one with a typed patch.
    store
        .update_by_id(
            &1,
            &CandidatureChanges {
                status: Some("submitted".into()),
                ..Default::default()
            },
        )
        .unwrap();

    let state = store.get_state().unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(state[0].status, "submitted");
    assert_eq!(state[0].company, "Acme");
    assert_eq!(state[1].status, "draft");

    // Annotate the second one with a dynamic patch.
    store
        .update_by_id(
            &2,
            &JsonPatch::new()
                .set("status", "interview")
                .set("notes", "on-site thursday"),
        )
        .unwrap();

    let globex = store.get(&2).unwrap().unwrap();
    assert_eq!(globex.status, "interview");
    assert_eq!(globex.notes.as_deref(), Some("on-site thursday"));
    assert_eq!(globex.company, "Globex");

    // An update against an id nobody has is a silent no-op.
    store
        .update_by_id(&404, &JsonPatch::new().set("status", "rejected"))
        .unwrap();
    assert_eq!(store.len().unwrap(), 2);

    // Four commits happened in total; the no-op did not re-render the view.
    assert_eq!(renders.load(Ordering::SeqCst), 4);
}

#[test]
fn snapshots_survive_later_mutations() {
    let store = EntityStore::new();
    store.append(Candidature::new(1, "Acme")).unwrap();

    let before = store.get_state().unwrap();
    store
        .update_by_id(&1, &JsonPatch::new().set("status", "submitted"))
        .unwrap();
    store.append(Candidature::new(2, "Globex")).unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(before[0].status, "draft");

    let after = store.get_state().unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].status, "submitted");
}

#[test]
fn duplicate_ids_updated_together() {
    let store = EntityStore::new();
    store.append(Candidature::new(1, "Acme")).unwrap();
    store.append(Candidature::new(1, "Acme EU")).unwrap();

    store
        .update_by_id(&1, &JsonPatch::new().set("status", "withdrawn"))
        .unwrap();

    let state = store.get_state().unwrap();
    assert_eq!(state.len(), 2);
    assert!(state.iter().all(|c| c.status == "withdrawn"));
    assert_eq!(state[0].company, "Acme");
    assert_eq!(state[1].company, "Acme EU");
}

#[test]
fn listeners_observe_each_commit_in_order() {
    let store = EntityStore::new();
    let statuses = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&statuses);
    let subscription = store.subscribe(move |state: &[Candidature]| {
        let snapshot: Vec<String> = state.iter().map(|c| c.status.clone()).collect();
        sink.lock().unwrap().push(snapshot);
    });

    store.append(Candidature::new(1, "Acme")).unwrap();
    store
        .update_by_id(&1, &JsonPatch::new().set("status", "submitted"))
        .unwrap();

    subscription.unsubscribe();
    store
        .update_by_id(&1, &JsonPatch::new().set("status", "rejected"))
        .unwrap();

    let seen = statuses.lock().unwrap();
    assert_eq!(*seen, vec![vec!["draft".to_string()], vec!["submitted".to_string()]]);
}

#[test]
fn isolated_contexts_do_not_share_state() {
    let context_a = AppContext::new();
    let context_b = AppContext::new();
    context_a.register(EntityStore::<Candidature>::new());
    context_b.register(EntityStore::<Candidature>::new());

    context_a
        .store::<Candidature>()
        .unwrap()
        .append(Candidature::new(1, "Acme"))
        .unwrap();

    assert_eq!(context_a.store::<Candidature>().unwrap().len().unwrap(), 1);
    assert!(context_b.store::<Candidature>().unwrap().is_empty().unwrap());
}

#[test]
fn shared_handles_observe_writes_from_any_holder() {
    let store = EntityStore::new();
    let writer = store.clone();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let writer = writer.clone();
            std::thread::spawn(move || {
                writer
                    .append(Candidature::new(i, &format!("company-{}", i)))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 4);
    assert_eq!(store.count(|c| c.status == "draft").unwrap(), 4);
}
