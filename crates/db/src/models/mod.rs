//! Entity rows, their wire DTOs, and the mapping between the two.
//!
//! Each module pairs a storage struct (`FromRow`, snake_case columns) with a
//! DTO (`camelCase` JSON, field constraints via `validator`). DTO equality is
//! identity-based, see [`dlife_core::resource::same_identity`].

use std::fmt::Debug;

use dlife_core::resource::Resource;
use dlife_core::types::{DbId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

pub mod attendee;
pub mod fitness_activity;
pub mod pics;
pub mod rates;
pub mod wechat_user;

/// A persisted record with a storage-assigned identifier.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Backing table name.
    const TABLE: &'static str;

    /// `None` until the row is first persisted.
    fn id(&self) -> Option<DbId>;

    fn set_id(&mut self, id: DbId);

    /// `(constraint name, value)` for every unique column.
    ///
    /// Only consulted by stores that enforce uniqueness themselves; PostgreSQL
    /// relies on the schema constraints of the same names.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Set audit columns before a save. `previous` is the stored row being
    /// replaced, if any.
    fn stamp_audit(&mut self, _previous: Option<&Self>, _now: Timestamp) {}

    /// Give fresh ids to owned child rows. A child keeps its id only when
    /// `previous` (the stored row being replaced) already owns that child.
    fn assign_nested_ids(
        &mut self,
        _previous: Option<&Self>,
        _next_id: &mut dyn FnMut() -> DbId,
    ) {
    }
}

/// Field-level conversion between a DTO and its entity.
pub trait EntityMapper:
    Resource + Validate + Serialize + DeserializeOwned + Debug
{
    type Entity: Entity;

    fn into_entity(self) -> Self::Entity;

    fn from_entity(entity: Self::Entity) -> Self;
}
