//! Entity contract for store members.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be held in an [`EntityStore`](crate::EntityStore).
///
/// The id is caller-assigned and compared by value. The store does not
/// enforce uniqueness: appending two entities with the same id is allowed,
/// and an update by that id applies to every match.
///
/// ## Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use viewstore::Entity;
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
/// ```
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The identifier type. Equality-compared by value on lookup and update.
    type Id: Clone + PartialEq + fmt::Debug + Send + Sync;

    /// Returns the identifier of this entity.
    fn id(&self) -> &Self::Id;
}
