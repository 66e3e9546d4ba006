use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireSuperAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateRoleDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Get the acting user's resolved identity and role
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Resolved identity", body = ApiResponse<AuthenticatedUser>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<AuthenticatedUser>>> {
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// Change a user's role (super admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "Super admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_role(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
    AppJson(body): AppJson<UpdateRoleDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.set_role(id, body.role).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("Role updated".to_string()),
        None,
    )))
}
