//! FitnessActivity: an organized activity with sign-up and activity windows
//! and an owned set of pictures.

use dlife_core::identity_eq;
use dlife_core::resource::Resource;
use dlife_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::pics::{Pics, PicsDto};
use crate::models::{Entity, EntityMapper};

/// A row from the `fitness_activity` table plus its pictures.
#[derive(Debug, Clone, FromRow)]
pub struct FitnessActivity {
    pub id: Option<DbId>,
    pub title: Option<String>,
    pub descrption: Option<String>,
    pub wechat_user_id: Option<String>,
    pub nick_name: Option<String>,
    pub avatar: Option<String>,
    pub project: Option<String>,
    pub company_role: Option<String>,
    pub sign_start_time: Option<Timestamp>,
    pub sign_end_time: Option<Timestamp>,
    pub activity_start_time: Option<Timestamp>,
    pub activity_end_time: Option<Timestamp>,
    pub attend_count: Option<i32>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
    /// Loaded from `pics` separately.
    #[sqlx(skip)]
    pub images: Vec<Pics>,
}

impl Entity for FitnessActivity {
    const TABLE: &'static str = "fitness_activity";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
        for pic in &mut self.images {
            pic.fitness_activity_id = Some(id);
        }
    }

    fn stamp_audit(&mut self, previous: Option<&Self>, now: Timestamp) {
        self.created_time = Some(previous.and_then(|p| p.created_time).unwrap_or(now));
        self.modified_time = Some(now);
    }

    fn assign_nested_ids(&mut self, previous: Option<&Self>, next_id: &mut dyn FnMut() -> DbId) {
        let owned: Vec<DbId> = previous
            .map(|p| p.images.iter().filter_map(|pic| pic.id).collect())
            .unwrap_or_default();
        for pic in &mut self.images {
            match pic.id {
                Some(id) if owned.contains(&id) => {}
                _ => pic.id = Some(next_id()),
            }
            pic.fitness_activity_id = self.id;
        }
    }
}

/// Wire representation of [`FitnessActivity`].
///
/// `descrption` keeps the spelling existing clients send.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FitnessActivityDto {
    pub id: Option<DbId>,
    #[validate(length(max = 64))]
    pub title: Option<String>,
    #[validate(length(max = 128))]
    pub descrption: Option<String>,
    #[validate(length(max = 128))]
    pub wechat_user_id: Option<String>,
    #[validate(length(max = 128))]
    pub nick_name: Option<String>,
    #[validate(length(max = 1024))]
    pub avatar: Option<String>,
    #[validate(length(max = 128))]
    pub project: Option<String>,
    #[validate(length(max = 255))]
    pub company_role: Option<String>,
    pub sign_start_time: Option<Timestamp>,
    pub sign_end_time: Option<Timestamp>,
    pub activity_start_time: Option<Timestamp>,
    pub activity_end_time: Option<Timestamp>,
    pub attend_count: Option<i32>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<PicsDto>,
}

identity_eq!(FitnessActivityDto);

impl Resource for FitnessActivityDto {
    const ENTITY_NAME: &'static str = "fitnessActivity";
    const RESOURCE_PATH: &'static str = "fitness-activities";

    fn id(&self) -> Option<DbId> {
        self.id
    }
}

impl EntityMapper for FitnessActivityDto {
    type Entity = FitnessActivity;

    fn into_entity(self) -> FitnessActivity {
        let id = self.id;
        FitnessActivity {
            id,
            title: self.title,
            descrption: self.descrption,
            wechat_user_id: self.wechat_user_id,
            nick_name: self.nick_name,
            avatar: self.avatar,
            project: self.project,
            company_role: self.company_role,
            sign_start_time: self.sign_start_time,
            sign_end_time: self.sign_end_time,
            activity_start_time: self.activity_start_time,
            activity_end_time: self.activity_end_time,
            attend_count: self.attend_count,
            created_time: self.created_time,
            modified_time: self.modified_time,
            images: self
                .images
                .into_iter()
                .map(|dto| Pics {
                    fitness_activity_id: id,
                    ..Pics::from(dto)
                })
                .collect(),
        }
    }

    fn from_entity(entity: FitnessActivity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            descrption: entity.descrption,
            wechat_user_id: entity.wechat_user_id,
            nick_name: entity.nick_name,
            avatar: entity.avatar,
            project: entity.project,
            company_role: entity.company_role,
            sign_start_time: entity.sign_start_time,
            sign_end_time: entity.sign_end_time,
            activity_start_time: entity.activity_start_time,
            activity_end_time: entity.activity_end_time,
            attend_count: entity.attend_count,
            created_time: entity.created_time,
            modified_time: entity.modified_time,
            images: entity.images.into_iter().map(PicsDto::from).collect(),
        }
    }
}
