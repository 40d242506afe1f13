//! Observable entity stores.
//!
//! An [`EntityStore`] holds an insertion-ordered sequence of entities behind
//! a copy-on-write snapshot: reads capture the current sequence cheaply and
//! are never affected by later mutations. Listeners registered through
//! [`EntityStore::subscribe`] run synchronously after every committed
//! mutation, in registration order.
//!
//! ## Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use viewstore::{Entity, EntityStore, JsonPatch};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Candidature {
//!     id: u64,
//!     status: String,
//! }
//!
//! impl Entity for Candidature {
//!     type Id = u64;
//!     fn id(&self) -> &u64 {
//!         &self.id
//!     }
//! }
//!
//! let store = EntityStore::new();
//! store.append(Candidature { id: 1, status: "draft".into() })?;
//! store.update_by_id(&1, &JsonPatch::new().set("status", "submitted"))?;
//!
//! let state = store.get_state()?;
//! assert_eq!(state[0].status, "submitted");
//! # Ok::<(), viewstore::StoreError>(())
//! ```

mod entity_store;
mod subscription;

use std::fmt;
use std::sync::Arc;

use crate::patch::PatchError;

/// A captured view of the store's sequence.
///
/// Snapshots are copy-on-write: mutations swap in a new sequence, so a
/// snapshot taken earlier keeps its contents unchanged.
pub type Snapshot<E> = Arc<Vec<E>>;

/// Error type for store operations.
///
/// Store operations are total over domain input: appending anything
/// succeeds, and updating an unknown id is a no-op. Errors arise only from
/// lock poisoning or a failed dynamic patch merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A panic in another holder of the store poisoned an internal lock.
    LockPoisoned(&'static str),
    /// A patch failed to merge; the sequence was left unchanged.
    Patch(PatchError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Patch(err) => write!(f, "store update failed: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Patch(err) => Some(err),
            StoreError::LockPoisoned(_) => None,
        }
    }
}

impl From<PatchError> for StoreError {
    fn from(err: PatchError) -> Self {
        StoreError::Patch(err)
    }
}

pub use entity_store::EntityStore;
pub use subscription::{Listener, Subscription};
