//! Repository for the `fitness_activity` table and its owned `pics` rows.

use std::collections::HashMap;

use async_trait::async_trait;
use dlife_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::DbError;
use crate::models::fitness_activity::FitnessActivity;
use crate::models::pics::Pics;
use crate::repositories::Repository;

const COLUMNS: &str = "id, title, descrption, wechat_user_id, nick_name, avatar, project, \
                       company_role, sign_start_time, sign_end_time, activity_start_time, \
                       activity_end_time, attend_count, created_time, modified_time";

const PIC_COLUMNS: &str = "id, url, fitness_activity_id";

/// PostgreSQL-backed [`Repository`] for [`FitnessActivity`].
///
/// The picture set is owned: saving an activity reconciles `pics` to exactly
/// the images carried by the entity, all inside one transaction. Deleting the
/// activity removes its pictures through `ON DELETE CASCADE`.
#[derive(Clone)]
pub struct FitnessActivityRepo {
    pool: PgPool,
}

impl FitnessActivityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        conn: &mut PgConnection,
        activity: &FitnessActivity,
    ) -> Result<FitnessActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO fitness_activity
                (title, descrption, wechat_user_id, nick_name, avatar, project, company_role,
                 sign_start_time, sign_end_time, activity_start_time, activity_end_time,
                 attend_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FitnessActivity>(&query)
            .bind(&activity.title)
            .bind(&activity.descrption)
            .bind(&activity.wechat_user_id)
            .bind(&activity.nick_name)
            .bind(&activity.avatar)
            .bind(&activity.project)
            .bind(&activity.company_role)
            .bind(activity.sign_start_time)
            .bind(activity.sign_end_time)
            .bind(activity.activity_start_time)
            .bind(activity.activity_end_time)
            .bind(activity.attend_count)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        activity: &FitnessActivity,
    ) -> Result<Option<FitnessActivity>, sqlx::Error> {
        let query = format!(
            "UPDATE fitness_activity SET
                title = $2,
                descrption = $3,
                wechat_user_id = $4,
                nick_name = $5,
                avatar = $6,
                project = $7,
                company_role = $8,
                sign_start_time = $9,
                sign_end_time = $10,
                activity_start_time = $11,
                activity_end_time = $12,
                attend_count = $13,
                modified_time = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FitnessActivity>(&query)
            .bind(id)
            .bind(&activity.title)
            .bind(&activity.descrption)
            .bind(&activity.wechat_user_id)
            .bind(&activity.nick_name)
            .bind(&activity.avatar)
            .bind(&activity.project)
            .bind(&activity.company_role)
            .bind(activity.sign_start_time)
            .bind(activity.sign_end_time)
            .bind(activity.activity_start_time)
            .bind(activity.activity_end_time)
            .bind(activity.attend_count)
            .fetch_optional(conn)
            .await
    }

    /// Make `pics` for `activity_id` match `images`: drop orphans, rewrite kept
    /// rows, insert new ones.
    async fn replace_images(
        conn: &mut PgConnection,
        activity_id: DbId,
        images: &[Pics],
    ) -> Result<Vec<Pics>, sqlx::Error> {
        let kept: Vec<DbId> = images.iter().filter_map(|p| p.id).collect();
        sqlx::query("DELETE FROM pics WHERE fitness_activity_id = $1 AND NOT (id = ANY($2))")
            .bind(activity_id)
            .bind(&kept)
            .execute(&mut *conn)
            .await?;

        let update = format!(
            "UPDATE pics SET url = $2 WHERE id = $1 AND fitness_activity_id = $3
             RETURNING {PIC_COLUMNS}"
        );
        let insert = format!(
            "INSERT INTO pics (url, fitness_activity_id) VALUES ($1, $2) RETURNING {PIC_COLUMNS}"
        );

        let mut saved = Vec::with_capacity(images.len());
        for pic in images {
            let existing = match pic.id {
                Some(pic_id) => {
                    sqlx::query_as::<_, Pics>(&update)
                        .bind(pic_id)
                        .bind(&pic.url)
                        .bind(activity_id)
                        .fetch_optional(&mut *conn)
                        .await?
                }
                None => None,
            };
            let row = match existing {
                Some(row) => row,
                None => {
                    sqlx::query_as::<_, Pics>(&insert)
                        .bind(&pic.url)
                        .bind(activity_id)
                        .fetch_one(&mut *conn)
                        .await?
                }
            };
            saved.push(row);
        }
        Ok(saved)
    }

    /// Attach pictures to already-loaded activities with one extra query.
    async fn load_images(&self, activities: &mut [FitnessActivity]) -> Result<(), sqlx::Error> {
        let ids: Vec<DbId> = activities.iter().filter_map(|a| a.id).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let query = format!(
            "SELECT {PIC_COLUMNS} FROM pics WHERE fitness_activity_id = ANY($1) ORDER BY id"
        );
        let pics = sqlx::query_as::<_, Pics>(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_activity: HashMap<DbId, Vec<Pics>> = HashMap::new();
        for pic in pics {
            if let Some(activity_id) = pic.fitness_activity_id {
                by_activity.entry(activity_id).or_default().push(pic);
            }
        }
        for activity in activities.iter_mut() {
            if let Some(id) = activity.id {
                activity.images = by_activity.remove(&id).unwrap_or_default();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<FitnessActivity> for FitnessActivityRepo {
    async fn find_all(&self) -> Result<Vec<FitnessActivity>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM fitness_activity ORDER BY id");
        let mut activities = sqlx::query_as::<_, FitnessActivity>(&query)
            .fetch_all(&self.pool)
            .await?;
        self.load_images(&mut activities).await?;
        Ok(activities)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<FitnessActivity>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM fitness_activity WHERE id = $1");
        let Some(activity) = sqlx::query_as::<_, FitnessActivity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let mut found = [activity];
        self.load_images(&mut found).await?;
        let [activity] = found;
        Ok(Some(activity))
    }

    async fn save(&self, activity: FitnessActivity) -> Result<FitnessActivity, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated = match activity.id {
            Some(id) => Self::update(&mut *tx, id, &activity).await?,
            None => None,
        };
        let mut saved = match updated {
            Some(row) => row,
            None => Self::insert(&mut *tx, &activity).await?,
        };

        if let Some(id) = saved.id {
            saved.images = Self::replace_images(&mut *tx, id, &activity.images).await?;
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete(&self, id: DbId) -> Result<(), DbError> {
        sqlx::query("DELETE FROM fitness_activity WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
