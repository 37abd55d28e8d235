//! The REST-facing identity of an entity.

use crate::types::DbId;

/// A wire representation (DTO) exposed as a REST resource.
///
/// Ties the DTO to the names used across the stack: the alert-header entity
/// name, the plural URL segment under `/api`, and the search index.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Entity name used in alert headers, e.g. `fitnessActivity`.
    const ENTITY_NAME: &'static str;

    /// URL segment under `/api`, e.g. `fitness-activities`.
    const RESOURCE_PATH: &'static str;

    fn id(&self) -> Option<DbId>;

    /// Search index holding this resource's documents.
    fn index_name() -> String {
        Self::ENTITY_NAME.to_lowercase()
    }
}

/// Identity equality for DTOs.
///
/// Two representations are the same entity only when both carry an id and the
/// ids match. An unsaved representation equals nothing, itself included.
pub fn same_identity(a: Option<DbId>, b: Option<DbId>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Implement `PartialEq` for a [`Resource`] by identity.
///
/// `Eq` and `Hash` are deliberately not derived: an unsaved value is not equal
/// to itself.
#[macro_export]
macro_rules! identity_eq {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::resource::same_identity(
                    $crate::resource::Resource::id(self),
                    $crate::resource::Resource::id(other),
                )
            }
        }
    };
}
