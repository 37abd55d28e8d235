//! WechatUser: a profile keyed by the WeChat open id.

use dlife_core::identity_eq;
use dlife_core::resource::Resource;
use dlife_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{Entity, EntityMapper};

/// Unique constraint on `wechat_user.open_id`.
pub const UQ_OPEN_ID: &str = "uq_wechat_user_open_id";

/// A row from the `wechat_user` table.
#[derive(Debug, Clone, FromRow)]
pub struct WechatUser {
    pub id: Option<DbId>,
    pub open_id: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
    pub mobile: Option<String>,
    pub project: Option<String>,
    pub seat: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub sex: Option<i32>,
    pub company_role: Option<String>,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

impl Entity for WechatUser {
    const TABLE: &'static str = "wechat_user";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![(UQ_OPEN_ID, self.open_id.clone())]
    }

    fn stamp_audit(&mut self, previous: Option<&Self>, now: Timestamp) {
        self.created_time = Some(previous.and_then(|p| p.created_time).unwrap_or(now));
        self.modified_time = Some(now);
    }
}

/// Wire representation of [`WechatUser`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WechatUserDto {
    pub id: Option<DbId>,
    #[validate(required, length(min = 1, max = 128))]
    pub open_id: Option<String>,
    #[validate(length(max = 128))]
    pub nick_name: Option<String>,
    #[validate(length(max = 1024))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 32))]
    pub mobile: Option<String>,
    #[validate(length(max = 128))]
    pub project: Option<String>,
    #[validate(length(max = 64))]
    pub seat: Option<String>,
    #[validate(length(max = 512))]
    pub bio: Option<String>,
    #[validate(length(max = 512))]
    pub skills: Option<String>,
    pub sex: Option<i32>,
    #[validate(length(max = 255))]
    pub company_role: Option<String>,
    pub is_admin: Option<bool>,
    pub is_blocked: Option<bool>,
    pub created_time: Option<Timestamp>,
    pub modified_time: Option<Timestamp>,
}

identity_eq!(WechatUserDto);

impl Resource for WechatUserDto {
    const ENTITY_NAME: &'static str = "wechatUser";
    const RESOURCE_PATH: &'static str = "wechat-users";

    fn id(&self) -> Option<DbId> {
        self.id
    }
}

impl EntityMapper for WechatUserDto {
    type Entity = WechatUser;

    fn into_entity(self) -> WechatUser {
        WechatUser {
            id: self.id,
            open_id: self.open_id.unwrap_or_default(),
            nick_name: self.nick_name,
            avatar_url: self.avatar_url,
            mobile: self.mobile,
            project: self.project,
            seat: self.seat,
            bio: self.bio,
            skills: self.skills,
            sex: self.sex,
            company_role: self.company_role,
            is_admin: self.is_admin.unwrap_or(false),
            is_blocked: self.is_blocked.unwrap_or(false),
            created_time: self.created_time,
            modified_time: self.modified_time,
        }
    }

    fn from_entity(entity: WechatUser) -> Self {
        Self {
            id: entity.id,
            open_id: Some(entity.open_id),
            nick_name: entity.nick_name,
            avatar_url: entity.avatar_url,
            mobile: entity.mobile,
            project: entity.project,
            seat: entity.seat,
            bio: entity.bio,
            skills: entity.skills,
            sex: entity.sex,
            company_role: entity.company_role,
            is_admin: Some(entity.is_admin),
            is_blocked: Some(entity.is_blocked),
            created_time: entity.created_time,
            modified_time: entity.modified_time,
        }
    }
}
