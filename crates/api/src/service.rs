//! Service layer: DTO <-> entity conversion plus search index upkeep.

use std::marker::PhantomData;
use std::sync::Arc;

use dlife_core::error::CoreError;
use dlife_core::types::DbId;
use dlife_db::models::EntityMapper;
use dlife_db::Repository;
use dlife_search::SearchIndex;

use crate::error::{AppError, AppResult};

/// CRUD and search over one resource type.
///
/// Every successful save or delete is mirrored into the search index before
/// the call returns. If the index write fails the storage change stays
/// committed and the caller sees the error.
pub struct EntityService<D: EntityMapper> {
    repo: Arc<dyn Repository<D::Entity>>,
    search: Arc<dyn SearchIndex>,
    _dto: PhantomData<fn() -> D>,
}

impl<D: EntityMapper> Clone for EntityService<D> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            search: Arc::clone(&self.search),
            _dto: PhantomData,
        }
    }
}

impl<D: EntityMapper> EntityService<D> {
    pub fn new(repo: Arc<dyn Repository<D::Entity>>, search: Arc<dyn SearchIndex>) -> Self {
        Self {
            repo,
            search,
            _dto: PhantomData,
        }
    }

    /// Insert or replace, then index the stored representation.
    pub async fn save(&self, dto: D) -> AppResult<D> {
        tracing::debug!(entity = D::ENTITY_NAME, ?dto, "Request to save");
        let saved = D::from_entity(self.repo.save(dto.into_entity()).await?);
        let id = saved.id().ok_or_else(|| {
            CoreError::Internal(format!("{} saved without an id", D::ENTITY_NAME))
        })?;
        let document =
            serde_json::to_value(&saved).map_err(|e| CoreError::Internal(e.to_string()))?;
        self.search.index(&D::index_name(), id, &document).await?;
        Ok(saved)
    }

    pub async fn find_all(&self) -> AppResult<Vec<D>> {
        tracing::debug!(entity = D::ENTITY_NAME, "Request to get all");
        let rows = self.repo.find_all().await?;
        Ok(rows.into_iter().map(D::from_entity).collect())
    }

    pub async fn find_one(&self, id: DbId) -> AppResult<Option<D>> {
        tracing::debug!(entity = D::ENTITY_NAME, id, "Request to get");
        Ok(self.repo.find_by_id(id).await?.map(D::from_entity))
    }

    /// Delete from storage and the index. Missing ids are not an error.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        tracing::debug!(entity = D::ENTITY_NAME, id, "Request to delete");
        self.repo.delete(id).await?;
        self.search.remove(&D::index_name(), id).await?;
        Ok(())
    }

    /// Hand `query` to the search index untouched.
    pub async fn search(&self, query: &str) -> AppResult<Vec<D>> {
        tracing::debug!(entity = D::ENTITY_NAME, query, "Request to search");
        let documents = self.search.search(&D::index_name(), query).await?;
        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc).map_err(|e| {
                    AppError::from(CoreError::Internal(format!("Bad search document: {e}")))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use dlife_db::models::wechat_user::{WechatUser, WechatUserDto};
    use dlife_db::MemoryRepository;
    use dlife_search::MemoryIndex;

    use super::*;

    fn service() -> EntityService<WechatUserDto> {
        EntityService::new(
            Arc::new(MemoryRepository::<WechatUser>::new()),
            Arc::new(MemoryIndex::new()),
        )
    }

    fn user(open_id: &str) -> WechatUserDto {
        WechatUserDto {
            open_id: Some(open_id.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_assigns_id_and_indexes() {
        let service = service();
        let saved = service.save(user("o-1")).await.unwrap();
        assert!(saved.id.is_some());
        assert!(saved.created_time.is_some());

        let hits = service.search("o-1").await.unwrap();
        assert_eq!(hits, vec![saved]);
    }

    #[tokio::test]
    async fn delete_removes_from_storage_and_index() {
        let service = service();
        let saved = service.save(user("o-2")).await.unwrap();
        let id = saved.id.unwrap();

        service.delete(id).await.unwrap();
        assert!(service.find_one(id).await.unwrap().is_none());
        assert!(service.search("*").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let service = service();
        let a = service.save(user("o-a")).await.unwrap();
        let b = service.save(user("o-b")).await.unwrap();
        assert_eq!(service.find_all().await.unwrap(), vec![a, b]);
    }
}
