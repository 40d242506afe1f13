//! Patch values and the pure shallow-merge underneath them.
//!
//! A patch is a partial record whose present fields override the
//! corresponding fields on a target entity. Merging is a pure function,
//! testable without a store.
//!
//! Two shapes of patch exist:
//! - a caller-defined struct of `Option` fields implementing [`Patch`]
//!   directly (infallible, no serialization involved), or
//! - [`JsonPatch`], a dynamic field map merged through `serde_json`.

use std::fmt;

use serde_json::{Map, Value};

use crate::entity::Entity;

/// A partial update that can be merged onto an entity.
///
/// `merge` produces a new entity with the patch's fields overlaid; fields
/// absent from the patch retain the original value. The original is never
/// modified.
pub trait Patch<E: Entity>: Send + Sync {
    /// Merge this patch onto `original`, producing the updated entity.
    fn merge(&self, original: &E) -> Result<E, PatchError>;
}

/// Error type for patch merges.
///
/// Typed patches never fail; only the serde round-trip of [`JsonPatch`]
/// can, e.g. when a patch field carries a value the entity type rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Serialization/deserialization error during a dynamic merge.
    Serde(String),
    /// The value handed to [`JsonPatch::from_value`] was not a JSON object.
    NotAnObject,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Serde(msg) => write!(f, "patch merge serde error: {}", msg),
            PatchError::NotAnObject => write!(f, "patch value must be a JSON object"),
        }
    }
}

impl std::error::Error for PatchError {}

/// Pure shallow merge of two JSON values.
///
/// When both are objects, the result holds every field of `original` with
/// `patch`'s fields overlaid (patch fields win, including explicit nulls).
/// Otherwise the patch replaces the original wholesale.
pub fn merge_value(original: &Value, patch: &Value) -> Value {
    match (original, patch) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            for (field, value) in overlay {
                merged.insert(field.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}

/// A dynamic patch: a set of field overrides applied through `serde_json`.
///
/// Useful when the fields to override are not known at compile time (e.g.
/// assembled from user input). For statically known updates, a struct of
/// `Option` fields implementing [`Patch`] avoids the serde round-trip.
///
/// ## Example
///
/// ```
/// use viewstore::JsonPatch;
///
/// let patch = JsonPatch::new()
///     .set("status", "submitted")
///     .set("score", 42);
/// assert_eq!(patch.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonPatch {
    fields: Map<String, Value>,
}

impl JsonPatch {
    /// Create an empty patch. Merging it is the identity.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Build a patch from a JSON value. Fails unless the value is an object.
    pub fn from_value(value: Value) -> Result<Self, PatchError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(PatchError::NotAnObject),
        }
    }

    /// Add a field override. Later calls for the same field win.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Add a field override from any serializable value.
    pub fn try_set<T: serde::Serialize>(
        mut self,
        field: impl Into<String>,
        value: &T,
    ) -> Result<Self, PatchError> {
        let value = serde_json::to_value(value).map_err(|e| PatchError::Serde(e.to_string()))?;
        self.fields.insert(field.into(), value);
        Ok(self)
    }

    /// Number of field overrides in this patch.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the patch carries no overrides.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl<E: Entity> Patch<E> for JsonPatch {
    fn merge(&self, original: &E) -> Result<E, PatchError> {
        let base = serde_json::to_value(original).map_err(|e| PatchError::Serde(e.to_string()))?;
        let merged = merge_value(&base, &Value::Object(self.fields.clone()));
        serde_json::from_value(merged).map_err(|e| PatchError::Serde(e.to_string()))
    }
}
