//! The persistence seam and its PostgreSQL implementations.
//!
//! Every entity gets a `*Repo` over a shared pool. All of them follow the
//! same save semantics: an entity without an id is inserted; an entity with an
//! id replaces that row, and if the row no longer exists it is inserted under
//! a fresh id.

use async_trait::async_trait;
use dlife_core::types::DbId;

use crate::error::DbError;

mod attendee_repo;
mod fitness_activity_repo;
mod rates_repo;
mod wechat_user_repo;

pub use attendee_repo::AttendeeRepo;
pub use fitness_activity_repo::FitnessActivityRepo;
pub use rates_repo::RatesRepo;
pub use wechat_user_repo::WechatUserRepo;

/// Find-by-id, find-all, save and delete for one entity type.
#[async_trait]
pub trait Repository<E>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    /// Every stored row, ordered by id.
    async fn find_all(&self) -> Result<Vec<E>, DbError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<E>, DbError>;

    /// Insert or fully replace, returning the stored row.
    async fn save(&self, entity: E) -> Result<E, DbError>;

    /// Remove a row. Deleting a missing id is not an error.
    async fn delete(&self, id: DbId) -> Result<(), DbError>;
}
