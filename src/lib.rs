//! viewstore - Observable in-memory entity stores for single-process UI state.
//!
//! An [`EntityStore`] holds an insertion-ordered sequence of entities:
//! append new ones, patch existing ones by id with shallow-merge semantics,
//! read copy-on-write snapshots, and subscribe to changes with synchronous,
//! registration-order notification. Stores are explicit values wired to
//! consumers through an [`AppContext`] rather than ambient globals.
//!
//! ## Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use viewstore::{AppContext, Entity, EntityStore, JsonPatch};
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
//! let context = AppContext::new();
//! context.register(EntityStore::<Candidature>::new());
//!
//! let store = context.store::<Candidature>().unwrap();
//! let _subscription = store.subscribe(|state| println!("{} candidatures", state.len()));
//!
//! store.append(Candidature { id: 1, status: "draft".into() })?;
//! store.update_by_id(&1, &JsonPatch::new().set("status", "submitted"))?;
//!
//! assert_eq!(store.get_state()?[0].status, "submitted");
//! # Ok::<(), viewstore::StoreError>(())
//! ```

mod context;
mod entity;
mod patch;
mod store;

pub use context::AppContext;
pub use entity::Entity;
pub use patch::{merge_value, JsonPatch, Patch, PatchError};
pub use store::{EntityStore, Listener, Snapshot, StoreError, Subscription};
