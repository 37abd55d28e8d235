//! Repository for the `rates` table.

use async_trait::async_trait;
use dlife_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::rates::Rates;
use crate::repositories::Repository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, rate, comments, activity_id, wechat_user_id, nick_name, created_time, modified_time";

/// PostgreSQL-backed [`Repository`] for [`Rates`].
#[derive(Clone)]
pub struct RatesRepo {
    pool: PgPool,
}

impl RatesRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, rates: &Rates) -> Result<Rates, sqlx::Error> {
        let query = format!(
            "INSERT INTO rates (rate, comments, activity_id, wechat_user_id, nick_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rates>(&query)
            .bind(rates.rate)
            .bind(&rates.comments)
            .bind(rates.activity_id)
            .bind(&rates.wechat_user_id)
            .bind(&rates.nick_name)
            .fetch_one(&self.pool)
            .await
    }

    /// Replace every column of an existing row. Returns `None` if `id` is gone.
    async fn update(&self, id: DbId, rates: &Rates) -> Result<Option<Rates>, sqlx::Error> {
        let query = format!(
            "UPDATE rates SET
                rate = $2,
                comments = $3,
                activity_id = $4,
                wechat_user_id = $5,
                nick_name = $6,
                modified_time = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rates>(&query)
            .bind(id)
            .bind(rates.rate)
            .bind(&rates.comments)
            .bind(rates.activity_id)
            .bind(&rates.wechat_user_id)
            .bind(&rates.nick_name)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl Repository<Rates> for RatesRepo {
    async fn find_all(&self) -> Result<Vec<Rates>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM rates ORDER BY id");
        Ok(sqlx::query_as::<_, Rates>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Rates>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM rates WHERE id = $1");
        Ok(sqlx::query_as::<_, Rates>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, rates: Rates) -> Result<Rates, DbError> {
        if let Some(id) = rates.id {
            if let Some(updated) = self.update(id, &rates).await? {
                return Ok(updated);
            }
        }
        Ok(self.insert(&rates).await?)
    }

    async fn delete(&self, id: DbId) -> Result<(), DbError> {
        sqlx::query("DELETE FROM rates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
