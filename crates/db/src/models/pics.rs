//! Pictures owned by a fitness activity.

use dlife_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `pics` table. Only ever saved through its activity.
#[derive(Debug, Clone, FromRow)]
pub struct Pics {
    pub id: Option<DbId>,
    pub url: String,
    pub fitness_activity_id: Option<DbId>,
}

/// Wire representation of [`Pics`], nested under an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PicsDto {
    pub id: Option<DbId>,
    #[validate(required, length(max = 1024))]
    pub url: Option<String>,
    pub fitness_activity_id: Option<DbId>,
}

impl PartialEq for PicsDto {
    fn eq(&self, other: &Self) -> bool {
        dlife_core::resource::same_identity(self.id, other.id)
    }
}

impl From<PicsDto> for Pics {
    fn from(dto: PicsDto) -> Self {
        Self {
            id: dto.id,
            url: dto.url.unwrap_or_default(),
            fitness_activity_id: dto.fitness_activity_id,
        }
    }
}

impl From<Pics> for PicsDto {
    fn from(pics: Pics) -> Self {
        Self {
            id: pics.id,
            url: Some(pics.url),
            fitness_activity_id: pics.fitness_activity_id,
        }
    }
}
