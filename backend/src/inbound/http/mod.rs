//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod roles;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;
use validation::{malformed_body_error, malformed_query_error};

/// The `/api/v1` scope with every directory endpoint registered.
///
/// Extractor failures (unparseable JSON, query strings or path segments)
/// are reported through the same error envelope as domain failures.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_directory::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| malformed_body_error(err).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| malformed_query_error(err).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| malformed_query_error(err).into()),
        )
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::edit_user)
        .service(users::delete_user)
        .service(roles::change_user_roles)
        .service(roles::list_roles)
}
