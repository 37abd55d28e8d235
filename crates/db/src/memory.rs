//! In-process store used when no database is configured.
//!
//! Mirrors the PostgreSQL repositories closely enough for local development
//! and tests: sequential ids, full-replace saves, audit stamping, owned child
//! ids, and the same named unique constraints the schema declares.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use dlife_core::types::DbId;

use crate::error::DbError;
use crate::models::Entity;
use crate::repositories::Repository;

struct Table<E> {
    rows: BTreeMap<DbId, E>,
    next_id: DbId,
    next_nested_id: DbId,
}

/// A [`Repository`] over a `BTreeMap`, one per entity type.
pub struct MemoryRepository<E> {
    table: RwLock<Table<E>>,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
                next_nested_id: 1,
            }),
        }
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Table<E> {
    /// First unique key of `entity` already held by a different row.
    fn conflicting_constraint(&self, entity: &E) -> Option<&'static str> {
        let keys = entity.unique_keys();
        self.rows
            .values()
            .filter(|row| row.id() != entity.id())
            .flat_map(|row| row.unique_keys())
            .find(|existing| keys.contains(existing))
            .map(|(constraint, _)| constraint)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, DbError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<E>, DbError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.get(&id).cloned())
    }

    async fn save(&self, mut entity: E) -> Result<E, DbError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);

        // An id that is no longer stored is treated like a fresh insert.
        let previous = entity.id().and_then(|id| table.rows.get(&id).cloned());
        if previous.is_none() {
            let id = table.next_id;
            table.next_id += 1;
            entity.set_id(id);
        }

        if let Some(constraint) = table.conflicting_constraint(&entity) {
            if previous.is_none() {
                table.next_id -= 1;
            }
            return Err(DbError::UniqueViolation {
                constraint: constraint.to_string(),
            });
        }

        entity.stamp_audit(previous.as_ref(), chrono::Utc::now());
        let mut next_nested = table.next_nested_id;
        entity.assign_nested_ids(previous.as_ref(), &mut || {
            let id = next_nested;
            next_nested += 1;
            id
        });
        table.next_nested_id = next_nested;

        if let Some(id) = entity.id() {
            table.rows.insert(id, entity.clone());
        }
        tracing::trace!(table = E::TABLE, id = ?entity.id(), "Saved in-memory row");
        Ok(entity)
    }

    async fn delete(&self, id: DbId) -> Result<(), DbError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::fitness_activity::FitnessActivityDto;
    use crate::models::pics::PicsDto;
    use crate::models::rates::RatesDto;
    use crate::models::wechat_user::{WechatUser, WechatUserDto, UQ_OPEN_ID};
    use crate::models::EntityMapper;

    fn user(open_id: &str) -> WechatUser {
        WechatUserDto {
            open_id: Some(open_id.into()),
            ..Default::default()
        }
        .into_entity()
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_audit_times() {
        let repo = MemoryRepository::new();
        let first = repo.save(user("a")).await.unwrap();
        let second = repo.save(user("b")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(first.created_time.is_some());
        assert_eq!(first.created_time, first.modified_time);
    }

    #[tokio::test]
    async fn duplicate_unique_key_is_rejected_without_burning_an_id() {
        let repo = MemoryRepository::new();
        repo.save(user("abc")).await.unwrap();

        let err = repo.save(user("abc")).await.unwrap_err();
        assert_matches!(err, DbError::UniqueViolation { ref constraint } if constraint == UQ_OPEN_ID);

        let next = repo.save(user("xyz")).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn resaving_a_row_keeps_its_own_unique_key() {
        let repo = MemoryRepository::new();
        let mut saved = repo.save(user("abc")).await.unwrap();
        saved.nick_name = Some("renamed".into());

        let updated = repo.save(saved.clone()).await.unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_time, saved.created_time);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn saving_with_an_unknown_id_inserts_a_new_row() {
        let repo = MemoryRepository::new();
        let entity = RatesDto {
            id: Some(99),
            rate: Some(2),
            ..Default::default()
        }
        .into_entity();

        let saved = repo.save(entity).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert!(repo.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_a_no_op() {
        let repo: MemoryRepository<WechatUser> = MemoryRepository::new();
        repo.delete(42).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn activity_pictures_get_ids_and_parent_link() {
        let repo = MemoryRepository::new();
        let activity = FitnessActivityDto {
            title: Some("Morning run".into()),
            images: vec![PicsDto {
                url: Some("https://img/1.png".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
        .into_entity();

        let saved = repo.save(activity).await.unwrap();
        assert_eq!(saved.images.len(), 1);
        assert_eq!(saved.images[0].id, Some(1));
        assert_eq!(saved.images[0].fitness_activity_id, saved.id);
    }

    #[tokio::test]
    async fn picture_ids_from_another_activity_are_not_reused() {
        let repo = MemoryRepository::new();
        let first = repo
            .save(
                FitnessActivityDto {
                    images: vec![PicsDto {
                        url: Some("u1".into()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }
                .into_entity(),
            )
            .await
            .unwrap();
        let borrowed_id = first.images[0].id;

        let second = repo
            .save(
                FitnessActivityDto {
                    images: vec![PicsDto {
                        id: borrowed_id,
                        url: Some("u2".into()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }
                .into_entity(),
            )
            .await
            .unwrap();

        assert_ne!(second.images[0].id, borrowed_id);
        assert_eq!(second.images[0].fitness_activity_id, second.id);
        let stored_first = repo.find_by_id(first.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored_first.images[0].id, borrowed_id);
    }

    #[tokio::test]
    async fn resaving_an_activity_keeps_its_own_picture_ids() {
        let repo = MemoryRepository::new();
        let saved = repo
            .save(
                FitnessActivityDto {
                    images: vec![PicsDto {
                        url: Some("u1".into()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }
                .into_entity(),
            )
            .await
            .unwrap();
        let pic_id = saved.images[0].id;

        let resaved = repo.save(saved.clone()).await.unwrap();
        assert_eq!(resaved.images[0].id, pic_id);
    }
}
