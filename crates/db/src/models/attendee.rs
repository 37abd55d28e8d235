//! Attendee: a WeChat user signed up for an activity.

use dlife_core::identity_eq;
use dlife_core::resource::Resource;
use dlife_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{Entity, EntityMapper};

/// A row from the `attendee` table.
#[derive(Debug, Clone, FromRow)]
pub struct Attendee {
    pub id: Option<DbId>,
    pub activity_id: DbId,
    pub wechat_user_id: String,
    pub nick_name: Option<String>,
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub checked_in: bool,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

impl Entity for Attendee {
    const TABLE: &'static str = "attendee";

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

/// Wire representation of [`Attendee`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDto {
    pub id: Option<DbId>,
    #[validate(required)]
    pub activity_id: Option<DbId>,
    #[validate(required, length(max = 128))]
    pub wechat_user_id: Option<String>,
    #[validate(length(max = 128))]
    pub nick_name: Option<String>,
    #[validate(length(max = 1024))]
    pub avatar: Option<String>,
    #[validate(length(max = 32))]
    pub status: Option<String>,
    pub checked_in: Option<bool>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

identity_eq!(AttendeeDto);

impl Resource for AttendeeDto {
    const ENTITY_NAME: &'static str = "attendee";
    const RESOURCE_PATH: &'static str = "attendees";

    fn id(&self) -> Option<DbId> {
        self.id
    }
}

impl EntityMapper for AttendeeDto {
    type Entity = Attendee;

    fn into_entity(self) -> Attendee {
        Attendee {
            id: self.id,
            activity_id: self.activity_id.unwrap_or_default(),
            wechat_user_id: self.wechat_user_id.unwrap_or_default(),
            nick_name: self.nick_name,
            avatar: self.avatar,
            status: self.status,
            checked_in: self.checked_in.unwrap_or(false),
            created_time: self.created_time,
            modified_time: self.modified_time,
        }
    }

    fn from_entity(entity: Attendee) -> Self {
        Self {
            id: entity.id,
            activity_id: Some(entity.activity_id),
            wechat_user_id: Some(entity.wechat_user_id),
            nick_name: entity.nick_name,
            avatar: entity.avatar,
            status: entity.status,
            checked_in: Some(entity.checked_in),
            created_time: entity.created_time,
            modified_time: entity.modified_time,
        }
    }
}
