//! Role catalogue and role assignment handlers.
//!
//! ```text
//! GET /api/v1/roles
//! PUT /api/v1/users/{userId}/roles ["User","Admin"]
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RoleChangeOutcome;
use crate::domain::Role;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Catalogue entry returned by `GET /api/v1/roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Admin")]
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.value(),
            name: role.name.into(),
        }
    }
}

/// Assignments changed by `PUT /api/v1/users/{userId}/roles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleChangeResponse {
    #[schema(example = json!(["Admin"]))]
    pub added: Vec<String>,
    #[schema(example = json!(["Support"]))]
    pub removed: Vec<String>,
}

impl From<RoleChangeOutcome> for RoleChangeResponse {
    fn from(outcome: RoleChangeOutcome) -> Self {
        Self {
            added: outcome.added.into_iter().map(String::from).collect(),
            removed: outcome.removed.into_iter().map(String::from).collect(),
        }
    }
}

/// List the role catalogue, highest priority first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_directory::inbound::http::roles::list_roles;
///
/// let _app = App::new().service(list_roles);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "Role catalogue", body = [RoleDto]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "listRoles"
)]
#[get("/roles")]
pub async fn list_roles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<RoleDto>>> {
    let roles = state.users.list_roles().await?;
    Ok(web::Json(roles.into_iter().map(RoleDto::from).collect()))
}

/// Replace a user's roles with exactly the requested set.
///
/// Every requested role must exist; if one does not, nothing changes.
/// Requesting the roles the user already holds is a successful no-op.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}/roles",
    params(("userId" = i64, Path, description = "User identifier")),
    request_body(content = Vec<String>, example = json!(["User", "Admin"])),
    responses(
        (status = 200, description = "Roles reconciled", body = RoleChangeResponse),
        (status = 400, description = "Empty role list or blank role name", body = ErrorSchema),
        (status = 404, description = "Unknown user or role", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "changeUserRoles"
)]
#[put("/users/{user_id}/roles")]
pub async fn change_user_roles(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<Vec<String>>,
) -> ApiResult<web::Json<RoleChangeResponse>> {
    let id = parse_user_id(path.into_inner())?;
    let outcome = state.commands.change_roles(id, payload.into_inner()).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockUsersCommand, MockUsersQuery};
    use crate::domain::{RoleName, UserId};
    use crate::inbound::http::test_utils::seeded_app;

    fn role(name: &str) -> RoleName {
        RoleName::new(name).expect("valid role")
    }

    #[rstest]
    #[actix_web::test]
    async fn roles_are_listed_by_priority() {
        let app = actix_test::init_service(seeded_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/roles")
            .to_request();
        let roles: Vec<RoleDto> = actix_test::call_and_read_body_json(&app, request).await;
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["SuperAdmin", "Admin", "Support", "User"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn reconciles_against_the_seeded_directory() {
        let app = actix_test::init_service(seeded_app()).await;
        let request = actix_test::TestRequest::put()
            .uri("/api/v1/users/6/roles")
            .set_json(json!(["SuperAdmin", "Admin"]))
            .to_request();
        let body: RoleChangeResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.added, ["Admin", "SuperAdmin"]);
        assert_eq!(body.removed, ["Support"]);

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/6")
            .to_request();
        let user: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(user["roles"], json!(["SuperAdmin", "Admin"]));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_role_is_not_found_and_changes_nothing() {
        let app = actix_test::init_service(seeded_app()).await;
        let request = actix_test::TestRequest::put()
            .uri("/api/v1/users/1/roles")
            .set_json(json!(["User", "Ghost"]))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "role Ghost not found");

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/1")
            .to_request();
        let user: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(user["roles"], json!(["User"]));
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_role_list_is_a_bad_request() {
        let app = actix_test::init_service(seeded_app()).await;
        let request = actix_test::TestRequest::put()
            .uri("/api/v1/users/1/roles")
            .set_json(json!([]))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn outcome_is_forwarded_from_the_command_port() {
        let mut commands = MockUsersCommand::new();
        commands
            .expect_change_roles()
            .with(
                eq(UserId::new(3).expect("valid id")),
                eq(vec!["Admin".to_owned()]),
            )
            .times(1)
            .return_once(|_, _| {
                Ok(RoleChangeOutcome {
                    added: vec![role("Admin")],
                    removed: vec![role("User")],
                })
            });
        let state = HttpState::new(Arc::new(MockUsersQuery::new()), Arc::new(commands));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(change_user_roles)),
        )
        .await;

        let request = actix_test::TestRequest::put()
            .uri("/api/v1/users/3/roles")
            .set_json(json!(["Admin"]))
            .to_request();
        let body: RoleChangeResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(
            body,
            RoleChangeResponse {
                added: vec!["Admin".to_owned()],
                removed: vec!["User".to_owned()],
            }
        );
    }
}
