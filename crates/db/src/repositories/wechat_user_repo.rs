//! Repository for the `wechat_user` table.

use async_trait::async_trait;
use dlife_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::wechat_user::WechatUser;
use crate::repositories::Repository;

const COLUMNS: &str = "id, open_id, nick_name, avatar_url, mobile, project, seat, bio, skills, \
                       sex, company_role, is_admin, is_blocked, created_time, modified_time";

/// PostgreSQL-backed [`Repository`] for [`WechatUser`].
///
/// `open_id` uniqueness is enforced by `uq_wechat_user_open_id`; a duplicate
/// surfaces as a [`DbError::Sqlx`] carrying SQLSTATE 23505.
#[derive(Clone)]
pub struct WechatUserRepo {
    pool: PgPool,
}

impl WechatUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look a profile up by its WeChat open id.
    pub async fn find_by_open_id(&self, open_id: &str) -> Result<Option<WechatUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wechat_user WHERE open_id = $1");
        sqlx::query_as::<_, WechatUser>(&query)
            .bind(open_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, user: &WechatUser) -> Result<WechatUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO wechat_user
                (open_id, nick_name, avatar_url, mobile, project, seat, bio, skills,
                 sex, company_role, is_admin, is_blocked)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WechatUser>(&query)
            .bind(&user.open_id)
            .bind(&user.nick_name)
            .bind(&user.avatar_url)
            .bind(&user.mobile)
            .bind(&user.project)
            .bind(&user.seat)
            .bind(&user.bio)
            .bind(&user.skills)
            .bind(user.sex)
            .bind(&user.company_role)
            .bind(user.is_admin)
            .bind(user.is_blocked)
            .fetch_one(&self.pool)
            .await
    }

    async fn update(&self, id: DbId, user: &WechatUser) -> Result<Option<WechatUser>, sqlx::Error> {
        let query = format!(
            "UPDATE wechat_user SET
                open_id = $2,
                nick_name = $3,
                avatar_url = $4,
                mobile = $5,
                project = $6,
                seat = $7,
                bio = $8,
                skills = $9,
                sex = $10,
                company_role = $11,
                is_admin = $12,
                is_blocked = $13,
                modified_time = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WechatUser>(&query)
            .bind(id)
            .bind(&user.open_id)
            .bind(&user.nick_name)
            .bind(&user.avatar_url)
            .bind(&user.mobile)
            .bind(&user.project)
            .bind(&user.seat)
            .bind(&user.bio)
            .bind(&user.skills)
            .bind(user.sex)
            .bind(&user.company_role)
            .bind(user.is_admin)
            .bind(user.is_blocked)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl Repository<WechatUser> for WechatUserRepo {
    async fn find_all(&self) -> Result<Vec<WechatUser>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM wechat_user ORDER BY id");
        Ok(sqlx::query_as::<_, WechatUser>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<WechatUser>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM wechat_user WHERE id = $1");
        Ok(sqlx::query_as::<_, WechatUser>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, user: WechatUser) -> Result<WechatUser, DbError> {
        if let Some(id) = user.id {
            if let Some(updated) = self.update(id, &user).await? {
                return Ok(updated);
            }
        }
        Ok(self.insert(&user).await?)
    }

    async fn delete(&self, id: DbId) -> Result<(), DbError> {
        sqlx::query("DELETE FROM wechat_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
