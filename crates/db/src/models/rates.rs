//! Rates: a participant's score and comment for an activity.

use dlife_core::identity_eq;
use dlife_core::resource::Resource;
use dlife_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{Entity, EntityMapper};

/// A row from the `rates` table.
#[derive(Debug, Clone, FromRow)]
pub struct Rates {
    pub id: Option<DbId>,
    pub rate: i32,
    pub comments: Option<String>,
    pub activity_id: Option<DbId>,
    pub wechat_user_id: Option<String>,
    pub nick_name: Option<String>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

impl Entity for Rates {
    const TABLE: &'static str = "rates";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn stamp_audit(&mut self, previous: Option<&Self>, now: Timestamp) {
        self.created_time = Some(previous.and_then(|p| p.created_time).unwrap_or(now));
        self.modified_time = Some(now);
    }
}

/// Wire representation of [`Rates`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RatesDto {
    pub id: Option<DbId>,
    #[validate(required, range(min = 1, max = 5))]
    pub rate: Option<i32>,
    #[validate(length(max = 512))]
    pub comments: Option<String>,
    pub activity_id: Option<DbId>,
    #[validate(length(max = 128))]
    pub wechat_user_id: Option<String>,
    #[validate(length(max = 128))]
    pub nick_name: Option<String>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

identity_eq!(RatesDto);

impl Resource for RatesDto {
    const ENTITY_NAME: &'static str = "rates";
    const RESOURCE_PATH: &'static str = "rates";

    fn id(&self) -> Option<DbId> {
        self.id
    }
}

impl EntityMapper for RatesDto {
    type Entity = Rates;

    fn into_entity(self) -> Rates {
        Rates {
            id: self.id,
            // Presence is enforced by validation before mapping.
            rate: self.rate.unwrap_or_default(),
            comments: self.comments,
            activity_id: self.activity_id,
            wechat_user_id: self.wechat_user_id,
            nick_name: self.nick_name,
            created_time: self.created_time,
            modified_time: self.modified_time,
        }
    }

    fn from_entity(entity: Rates) -> Self {
        Self {
            id: entity.id,
            rate: Some(entity.rate),
            comments: entity.comments,
            activity_id: entity.activity_id,
            wechat_user_id: entity.wechat_user_id,
            nick_name: entity.nick_name,
            created_time: entity.created_time,
            modified_time: entity.modified_time,
        }
    }
}
