//! Alert headers attached to REST responses.
//!
//! Client tooling reads a pair of headers per response: a machine-readable
//! key (`X-<app>-alert` on success, `X-<app>-error` on failure) and a
//! parameter (`X-<app>-params`) carrying the entity id or entity name.

use crate::types::DbId;

/// A success or failure notification for one entity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert<'a> {
    Created { entity: &'a str, id: DbId },
    Updated { entity: &'a str, id: DbId },
    Deleted { entity: &'a str, id: DbId },
    Failure { entity: &'a str, error_key: &'a str },
}

impl Alert<'_> {
    /// Render the header pair for an application named `app_name`.
    pub fn headers(&self, app_name: &str) -> [(String, String); 2] {
        let params = format!("X-{app_name}-params");
        match *self {
            Alert::Created { entity, id } => [
                (format!("X-{app_name}-alert"), format!("{app_name}.{entity}.created")),
                (params, id.to_string()),
            ],
            Alert::Updated { entity, id } => [
                (format!("X-{app_name}-alert"), format!("{app_name}.{entity}.updated")),
                (params, id.to_string()),
            ],
            Alert::Deleted { entity, id } => [
                (format!("X-{app_name}-alert"), format!("{app_name}.{entity}.deleted")),
                (params, id.to_string()),
            ],
            Alert::Failure { entity, error_key } => [
                (format!("X-{app_name}-error"), format!("error.{error_key}")),
                (params, entity.to_string()),
            ],
        }
    }
}
