//! Explicit wiring for stores shared across an application.
//!
//! Instead of an ambient global store, an [`AppContext`] is constructed
//! once at startup, stores are registered into it, and consumers receive
//! the context explicitly. Handles pulled out of the context share storage
//! and listeners with the registered store, so tests can wire isolated
//! contexts without touching process-wide state.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::entity::Entity;
use crate::store::EntityStore;

/// By-type registry of entity stores.
///
/// ## Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use viewstore::{AppContext, Entity, EntityStore};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Candidature {
///     id: u64,
///     status: String,
/// }
///
/// impl Entity for Candidature {
///     type Id = u64;
///     fn id(&self) -> &u64 {
///         &self.id
///     }
/// }
///
/// let context = AppContext::new();
/// context.register(EntityStore::<Candidature>::new());
///
/// let store = context.store::<Candidature>().unwrap();
/// store.append(Candidature { id: 1, status: "draft".into() }).unwrap();
/// ```
pub struct AppContext {
    stores: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Register the store for entity type `E`, replacing any previous one.
    pub fn register<E: Entity>(&self, store: EntityStore<E>) {
        let mut stores = recover(self.stores.write());
        stores.insert(TypeId::of::<E>(), Box::new(store));
        debug!(
            entity = std::any::type_name::<E>(),
            registered = stores.len(),
            "store registered"
        );
    }

    /// Get a handle to the store for entity type `E`, if registered.
    ///
    /// The handle shares storage and listeners with the registered store.
    pub fn store<E: Entity>(&self) -> Option<EntityStore<E>> {
        let stores = recover(self.stores.read());
        stores
            .get(&TypeId::of::<E>())
            .and_then(|any| any.downcast_ref::<EntityStore<E>>())
            .cloned()
    }

    /// Check whether a store for entity type `E` is registered.
    pub fn contains<E: Entity>(&self) -> bool {
        recover(self.stores.read()).contains_key(&TypeId::of::<E>())
    }
}

/// Registration state stays consistent across panic points, so a poisoned
/// lock is safe to keep using.
fn recover<G>(result: Result<G, std::sync::PoisonError<G>>) -> G {
    result.unwrap_or_else(|poisoned| poisoned.into_inner())
}
