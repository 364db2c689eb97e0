//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every directory endpoint and health probe together
//! with the DTOs they exchange. The domain error is described through the
//! wrappers in [`crate::inbound::http::schemas`] so the domain stays free of
//! framework derives.
//!
//! The document backs Swagger UI in debug builds and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::roles::{RoleChangeResponse, RoleDto};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{PageInfoDto, UserDto, UserListResponse, UserPayload};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "Filtered, sorted and paginated user listings with role management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::edit_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::change_user_roles,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserDto,
        UserPayload,
        UserListResponse,
        PageInfoDto,
        RoleDto,
        RoleChangeResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Directory listing and user maintenance"),
        (name = "roles", description = "Role catalogue and assignments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
