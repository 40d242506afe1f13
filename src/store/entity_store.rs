//! EntityStore - observable, insertion-ordered entity collection.

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::subscription::{Subscribers, Subscription};
use super::{Snapshot, StoreError};
use crate::entity::Entity;
use crate::patch::Patch;

/// In-memory, observable holder of an insertion-ordered entity sequence.
///
/// Mutations are copy-on-write: each commit builds a new sequence and swaps
/// it in, so snapshots captured through [`get_state`](Self::get_state) are
/// never affected by later mutations. Clone-friendly via Arc; clones share
/// storage and listeners.
///
/// Id uniqueness is not enforced. Duplicate ids may be appended, and
/// [`update_by_id`](Self::update_by_id) patches every match identically.
#[derive(Clone)]
pub struct EntityStore<E: Entity> {
    entities: Arc<RwLock<Snapshot<E>>>,
    subscribers: Subscribers<E>,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(Arc::new(Vec::new()))),
            subscribers: Subscribers::new(),
        }
    }

    /// Create a store seeded with `entities`, in the given order.
    pub fn with_entities(entities: Vec<E>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(Arc::new(entities))),
            subscribers: Subscribers::new(),
        }
    }

    /// Append an entity to the end of the sequence.
    ///
    /// No validation is performed and nothing can conflict; prior entries
    /// are preserved unchanged. Listeners are notified after the commit.
    pub fn append(&self, entity: E) -> Result<(), StoreError> {
        let snapshot = {
            let mut current = self
                .entities
                .write()
                .map_err(|_| StoreError::LockPoisoned("append"))?;

            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(entity);

            *current = Arc::new(next);
            Arc::clone(&current)
        };

        debug!(len = snapshot.len(), "entity appended");
        self.subscribers.notify(&snapshot);
        Ok(())
    }

    /// Shallow-merge `patch` into every entity whose id equals `id`.
    ///
    /// Entities without a matching id are left untouched. No match is a
    /// no-op, not an error, and fires no notification. A failed merge
    /// aborts the whole update with the sequence unchanged.
    pub fn update_by_id<P: Patch<E>>(&self, id: &E::Id, patch: &P) -> Result<(), StoreError> {
        let snapshot = {
            let mut current = self
                .entities
                .write()
                .map_err(|_| StoreError::LockPoisoned("update_by_id"))?;

            let mut matched = 0usize;
            let mut next = Vec::with_capacity(current.len());
            for entity in current.iter() {
                if entity.id() == id {
                    next.push(patch.merge(entity)?);
                    matched += 1;
                } else {
                    next.push(entity.clone());
                }
            }

            if matched == 0 {
                debug!(id = ?id, "update matched no entity");
                return Ok(());
            }

            debug!(id = ?id, matched, "entities updated");
            *current = Arc::new(next);
            Arc::clone(&current)
        };

        self.subscribers.notify(&snapshot);
        Ok(())
    }

    /// Read the full current sequence.
    ///
    /// The returned snapshot is cheap to capture and keeps its contents
    /// even as the store continues to mutate.
    pub fn get_state(&self) -> Result<Snapshot<E>, StoreError> {
        let current = self
            .entities
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_state"))?;
        Ok(Arc::clone(&current))
    }

    /// Get the first entity whose id equals `id`. Returns None if not found.
    pub fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let state = self.get_state()?;
        Ok(state.iter().find(|e| e.id() == id).cloned())
    }

    /// Find entities matching a predicate, in sequence order.
    pub fn find(&self, predicate: impl Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        let state = self.get_state()?;
        Ok(state.iter().filter(|e| predicate(e)).cloned().collect())
    }

    /// Find the first entity matching a predicate.
    pub fn find_one(&self, predicate: impl Fn(&E) -> bool) -> Result<Option<E>, StoreError> {
        let state = self.get_state()?;
        Ok(state.iter().find(|e| predicate(e)).cloned())
    }

    /// Count entities matching a predicate.
    pub fn count(&self, predicate: impl Fn(&E) -> bool) -> Result<usize, StoreError> {
        let state = self.get_state()?;
        Ok(state.iter().filter(|e| predicate(e)).count())
    }

    /// Number of entities in the store.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.get_state()?.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.get_state()?.is_empty())
    }

    /// Register a listener invoked synchronously after every committed
    /// mutation, in registration order, with the post-mutation sequence.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<E>
    where
        F: Fn(&[E]) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }
}
