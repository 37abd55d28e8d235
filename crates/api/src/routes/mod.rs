pub mod health;

use axum::routing::get;
use axum::Router;
use dlife_db::models::attendee::AttendeeDto;
use dlife_db::models::fitness_activity::FitnessActivityDto;
use dlife_db::models::rates::RatesDto;
use dlife_db::models::wechat_user::WechatUserDto;
use dlife_db::models::EntityMapper;

use crate::handlers::resource;
use crate::state::{AppState, ServiceFor};

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rates                              list, create, update
/// /rates/{id}                         get, delete
/// /attendees                          list, create, update
/// /attendees/{id}                     get, delete
/// /fitness-activities                 list, create, update
/// /fitness-activities/{id}            get, delete
/// /wechat-users                       list, create, update
/// /wechat-users/{id}                  get, delete
///
/// /_search/rates?query=               search
/// /_search/attendees?query=           search
/// /_search/fitness-activities?query=  search
/// /_search/wechat-users?query=        search
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<RatesDto>())
        .merge(resource_routes::<AttendeeDto>())
        .merge(resource_routes::<FitnessActivityDto>())
        .merge(resource_routes::<WechatUserDto>())
}

/// The six REST operations for one resource type.
///
/// ```text
/// GET    /{path}                -> list
/// POST   /{path}                -> create
/// PUT    /{path}                -> update
/// GET    /{path}/{id}           -> get_by_id
/// DELETE /{path}/{id}           -> delete
/// GET    /_search/{path}        -> search
/// ```
pub fn resource_routes<D>() -> Router<AppState>
where
    D: EntityMapper,
    AppState: ServiceFor<D>,
{
    let path = format!("/{}", D::RESOURCE_PATH);
    Router::new()
        .route(
            &path,
            get(resource::list::<D>)
                .post(resource::create::<D>)
                .put(resource::update::<D>),
        )
        .route(
            &format!("{path}/{{id}}"),
            get(resource::get_by_id::<D>).delete(resource::delete::<D>),
        )
        .route(&format!("/_search{path}"), get(resource::search::<D>))
}
