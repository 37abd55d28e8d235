//! Handlers shared by every `/api/<resource>` route.
//!
//! Each handler is generic over the DTO type and picks its service from
//! [`AppState`] through [`ServiceFor`]. Mounted per entity in
//! [`crate::routes::resource_routes`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use dlife_core::alert::Alert;
use dlife_core::error::CoreError;
use dlife_core::types::DbId;
use dlife_db::models::EntityMapper;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::alert_headers;
use crate::state::{AppState, ServiceFor};

/// `?query=` for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

fn read_body<D: EntityMapper>(payload: Result<Json<D>, JsonRejection>) -> AppResult<D> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn saved_id<D: EntityMapper>(dto: &D) -> AppResult<DbId> {
    dto.id().ok_or_else(|| {
        AppError::InternalError(format!("{} saved without an id", D::ENTITY_NAME))
    })
}

/// Validate, insert, and answer 201 with `Location` and a creation alert.
async fn insert<D>(state: &AppState, dto: D) -> AppResult<(StatusCode, HeaderMap, Json<D>)>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    dto.validate().map_err(CoreError::from)?;
    let saved = ServiceFor::<D>::service(state).save(dto).await?;
    let id = saved_id(&saved)?;

    let mut headers = alert_headers(
        &state.config.app_name,
        Alert::Created {
            entity: D::ENTITY_NAME,
            id,
        },
    );
    let location = format!("/api/{}/{id}", D::RESOURCE_PATH);
    if let Ok(location) = HeaderValue::try_from(location) {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)))
}

/// POST /api/{resource}
pub async fn create<D>(
    State(state): State<AppState>,
    payload: Result<Json<D>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<D>)>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    let dto = read_body(payload)?;
    tracing::debug!(entity = D::ENTITY_NAME, ?dto, "REST request to create");
    if dto.id().is_some() {
        return Err(AppError::BadRequestAlert {
            app_name: state.config.app_name.clone(),
            entity: D::ENTITY_NAME,
            error_key: "idexists",
            message: format!("A new {} cannot already have an ID", D::ENTITY_NAME),
        });
    }
    insert(&state, dto).await
}

/// PUT /api/{resource}
///
/// A body without an id is created instead (201).
pub async fn update<D>(
    State(state): State<AppState>,
    payload: Result<Json<D>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<D>)>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    let dto = read_body(payload)?;
    tracing::debug!(entity = D::ENTITY_NAME, ?dto, "REST request to update");
    if dto.id().is_none() {
        return insert(&state, dto).await;
    }

    dto.validate().map_err(CoreError::from)?;
    let saved = ServiceFor::<D>::service(&state).save(dto).await?;
    let id = saved_id(&saved)?;
    let headers = alert_headers(
        &state.config.app_name,
        Alert::Updated {
            entity: D::ENTITY_NAME,
            id,
        },
    );
    Ok((StatusCode::OK, headers, Json(saved)))
}

/// GET /api/{resource}
pub async fn list<D>(State(state): State<AppState>) -> AppResult<Json<Vec<D>>>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    Ok(Json(ServiceFor::<D>::service(&state).find_all().await?))
}

/// GET /api/{resource}/{id}
pub async fn get_by_id<D>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<D>>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    let dto = ServiceFor::<D>::service(&state)
        .find_one(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: D::ENTITY_NAME,
            id,
        }))?;
    Ok(Json(dto))
}

/// DELETE /api/{resource}/{id}
///
/// Always 200, whether or not the row existed.
pub async fn delete<D>(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, HeaderMap)>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    ServiceFor::<D>::service(&state).delete(id).await?;
    let headers = alert_headers(
        &state.config.app_name,
        Alert::Deleted {
            entity: D::ENTITY_NAME,
            id,
        },
    );
    Ok((StatusCode::OK, headers))
}

/// GET /api/_search/{resource}?query=
pub async fn search<D>(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<D>>>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    let query = params
        .query
        .ok_or_else(|| AppError::BadRequest("Missing required parameter 'query'".into()))?;
    Ok(Json(ServiceFor::<D>::service(&state).search(&query).await?))
}
