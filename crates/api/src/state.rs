use std::sync::Arc;

use dlife_db::models::attendee::{Attendee, AttendeeDto};
use dlife_db::models::fitness_activity::{FitnessActivity, FitnessActivityDto};
use dlife_db::models::rates::{Rates, RatesDto};
use dlife_db::models::wechat_user::{WechatUser, WechatUserDto};
use dlife_db::models::EntityMapper;
use dlife_db::repositories::{AttendeeRepo, FitnessActivityRepo, RatesRepo, WechatUserRepo};
use dlife_db::{DbPool, MemoryRepository};
use dlife_search::SearchIndex;

use crate::config::ServerConfig;
use crate::service::EntityService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; `None` when running on the in-memory store.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    pub rates: EntityService<RatesDto>,
    pub attendees: EntityService<AttendeeDto>,
    pub fitness_activities: EntityService<FitnessActivityDto>,
    pub wechat_users: EntityService<WechatUserDto>,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing `pool`.
    pub fn with_postgres(
        config: Arc<ServerConfig>,
        pool: DbPool,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self {
            rates: EntityService::new(Arc::new(RatesRepo::new(pool.clone())), search.clone()),
            attendees: EntityService::new(
                Arc::new(AttendeeRepo::new(pool.clone())),
                search.clone(),
            ),
            fitness_activities: EntityService::new(
                Arc::new(FitnessActivityRepo::new(pool.clone())),
                search.clone(),
            ),
            wechat_users: EntityService::new(Arc::new(WechatUserRepo::new(pool.clone())), search),
            pool: Some(pool),
            config,
        }
    }

    /// State backed by in-process stores, one per entity.
    pub fn in_memory(config: Arc<ServerConfig>, search: Arc<dyn SearchIndex>) -> Self {
        Self {
            pool: None,
            config,
            rates: EntityService::new(
                Arc::new(MemoryRepository::<Rates>::new()),
                search.clone(),
            ),
            attendees: EntityService::new(
                Arc::new(MemoryRepository::<Attendee>::new()),
                search.clone(),
            ),
            fitness_activities: EntityService::new(
                Arc::new(MemoryRepository::<FitnessActivity>::new()),
                search.clone(),
            ),
            wechat_users: EntityService::new(
                Arc::new(MemoryRepository::<WechatUser>::new()),
                search,
            ),
        }
    }
}

/// Selects the [`EntityService`] for a resource type, so handlers can be
/// written once and mounted per entity.
pub trait ServiceFor<D: EntityMapper> {
    fn service(&self) -> &EntityService<D>;
}

impl ServiceFor<RatesDto> for AppState {
    fn service(&self) -> &EntityService<RatesDto> {
        &self.rates
    }
}

impl ServiceFor<AttendeeDto> for AppState {
    fn service(&self) -> &EntityService<AttendeeDto> {
        &self.attendees
    }
}

impl ServiceFor<FitnessActivityDto> for AppState {
    fn service(&self) -> &EntityService<FitnessActivityDto> {
        &self.fitness_activities
    }
}

impl ServiceFor<WechatUserDto> for AppState {
    fn service(&self) -> &EntityService<WechatUserDto> {
        &self.wechat_users
    }
}
