//! Repository for the `attendee` table.

use async_trait::async_trait;
use dlife_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::attendee::Attendee;
use crate::repositories::Repository;

const COLUMNS: &str = "id, activity_id, wechat_user_id, nick_name, avatar, status, checked_in, \
                       created_time, modified_time";

/// PostgreSQL-backed [`Repository`] for [`Attendee`].
#[derive(Clone)]
pub struct AttendeeRepo {
    pool: PgPool,
}

impl AttendeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, attendee: &Attendee) -> Result<Attendee, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendee (activity_id, wechat_user_id, nick_name, avatar, status, checked_in)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendee>(&query)
            .bind(attendee.activity_id)
            .bind(&attendee.wechat_user_id)
            .bind(&attendee.nick_name)
            .bind(&attendee.avatar)
            .bind(&attendee.status)
            .bind(attendee.checked_in)
            .fetch_one(&self.pool)
            .await
    }

    async fn update(&self, id: DbId, attendee: &Attendee) -> Result<Option<Attendee>, sqlx::Error> {
        let query = format!(
            "UPDATE attendee SET
                activity_id = $2,
                wechat_user_id = $3,
                nick_name = $4,
                avatar = $5,
                status = $6,
                checked_in = $7,
                modified_time = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendee>(&query)
            .bind(id)
            .bind(attendee.activity_id)
            .bind(&attendee.wechat_user_id)
            .bind(&attendee.nick_name)
            .bind(&attendee.avatar)
            .bind(&attendee.status)
            .bind(attendee.checked_in)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl Repository<Attendee> for AttendeeRepo {
    async fn find_all(&self) -> Result<Vec<Attendee>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM attendee ORDER BY id");
        Ok(sqlx::query_as::<_, Attendee>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Attendee>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM attendee WHERE id = $1");
        Ok(sqlx::query_as::<_, Attendee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, attendee: Attendee) -> Result<Attendee, DbError> {
        if let Some(id) = attendee.id {
            if let Some(updated) = self.update(id, &attendee).await? {
                return Ok(updated);
            }
        }
        Ok(self.insert(&attendee).await?)
    }

    async fn delete(&self, id: DbId) -> Result<(), DbError> {
        sqlx::query("DELETE FROM attendee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
