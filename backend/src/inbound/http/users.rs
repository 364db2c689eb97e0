//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users?userRoleName=Admin&ageFrom=30&sortOrder=name-descending
//! GET    /api/v1/users/{userId}
//! POST   /api/v1/users {"name":"Ada Lovelace","age":36,"email":"ada@example.com"}
//! PUT    /api/v1/users/{userId} {"name":"Ada Lovelace","age":37,"email":"ada@example.com"}
//! DELETE /api/v1/users/{userId}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{PageInfo, Paginated};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, ListUsersRequest, User, UserFilter, UserProfile, UserSortOrder, UserUpdate,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_user_id, user_validation_error};

/// A directory entry as returned to clients, roles in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Pavel Durov")]
    pub name: String,
    #[schema(example = 38)]
    pub age: i32,
    #[schema(example = "p.durov@telegram.com")]
    pub email: String,
    #[schema(example = json!(["SuperAdmin", "Admin"]))]
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id().value(),
            name: user.name().to_string(),
            age: user.age().value(),
            email: user.email().to_string(),
            roles: user.roles().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Pagination metadata for a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoDto {
    pub current_page: u32,
    pub total_pages: u64,
    pub page_size: u32,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<PageInfo> for PageInfoDto {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page(),
            total_pages: info.total_pages(),
            page_size: info.page_size(),
            total_count: info.total_count(),
            has_previous_page: info.has_previous_page(),
            has_next_page: info.has_next_page(),
        }
    }
}

/// Response body for `GET /api/v1/users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    pub pagination: PageInfoDto,
}

impl From<Paginated<User>> for UserListResponse {
    fn from(page: Paginated<User>) -> Self {
        let (users, info) = page.into_parts();
        Self {
            users: users.into_iter().map(UserDto::from).collect(),
            pagination: info.into(),
        }
    }
}

/// Query string accepted by `GET /api/v1/users`.
///
/// Blank text filters and zero age bounds are treated as absent.
#[derive(Debug, Default, Clone, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Only users holding this role.
    pub user_role_name: Option<String>,
    /// Case-sensitive substring of the name.
    pub name: Option<String>,
    /// Case-sensitive substring of the email.
    pub email: Option<String>,
    /// Inclusive lower age bound.
    pub age_from: Option<i32>,
    /// Inclusive upper age bound.
    pub age_to: Option<i32>,
    /// 1-based page number, default 1.
    pub page: Option<i64>,
    /// Items per page, default 10.
    pub page_size: Option<i64>,
    /// Sort key and direction, e.g. `name-descending` or `AgeAsc`.
    pub sort_order: Option<String>,
}

impl From<ListUsersQuery> for ListUsersRequest {
    fn from(query: ListUsersQuery) -> Self {
        let defaults = ListUsersRequest::default();
        let filter = UserFilter::default()
            .with_role(query.user_role_name.unwrap_or_default())
            .with_name(query.name.unwrap_or_default())
            .with_email(query.email.unwrap_or_default())
            .with_age_range(query.age_from.unwrap_or(0), query.age_to.unwrap_or(0));
        let order = query
            .sort_order
            .as_deref()
            .map(|raw| raw.parse::<UserSortOrder>().unwrap_or_default())
            .unwrap_or_default();
        ListUsersRequest::new(
            filter,
            query.page.unwrap_or(defaults.page),
            query.page_size.unwrap_or(defaults.page_size),
            order,
        )
    }
}

/// Request body for creating or editing a user.
///
/// Example JSON:
/// `{"name":"Ada Lovelace","age":36,"email":"ada@example.com"}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = 36)]
    pub age: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl TryFrom<UserPayload> for UserProfile {
    type Error = UserValidationError;

    fn try_from(value: UserPayload) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.name, value.email, value.age)
    }
}

fn profile_from(payload: web::Json<UserPayload>) -> Result<UserProfile, Error> {
    UserProfile::try_from(payload.into_inner()).map_err(user_validation_error)
}

/// Filter, sort and paginate the directory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_directory::inbound::http::users::list_users;
///
/// let _app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "A page of users", body = UserListResponse),
        (status = 400, description = "Invalid page or page size", body = ErrorSchema),
        (status = 404, description = "No users, no matches, or page out of range", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<UserListResponse>> {
    let page = state.users.list_users(query.into_inner().into()).await?;
    Ok(web::Json(page.into()))
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserDto>> {
    let id = parse_user_id(path.into_inner())?;
    let user = state.users.get_user(id).await?;
    Ok(web::Json(user.into()))
}

/// Create a user. The new user holds no roles.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserDto,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 409, description = "Email already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let profile = profile_from(payload)?;
    let user = state.commands.create_user(profile).await?;
    let location = format!("/api/v1/users/{}", user.id());
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(UserDto::from(user)))
}

/// Replace a user's name, age and email.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    params(("userId" = i64, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Email already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
#[put("/users/{user_id}")]
pub async fn edit_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserDto>> {
    let id = parse_user_id(path.into_inner())?;
    let profile = profile_from(payload)?;
    let user = state.commands.edit_user(UserUpdate { id, profile }).await?;
    Ok(web::Json(user.into()))
}

/// Delete a user and its role assignments.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}",
    params(("userId" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(path.into_inner())?;
    state.commands.delete_user(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
