use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::committees::dtos::{
    CommitteeTagResponseDto, CreateCommitteeTagDto, DeleteTagQuery,
};
use crate::features::committees::services::CommitteeService;
use crate::features::tickets::services::TicketService;
use crate::shared::types::ApiResponse;

/// State for committee tag handlers
#[derive(Clone)]
pub struct TagState {
    pub committee_service: Arc<CommitteeService>,
    pub ticket_service: Arc<TicketService>,
}

/// List a ticket's committee tags
#[utoipa::path(
    get,
    path = "/api/tickets/{id}/committee-tags",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Tags with embedded committees", body = ApiResponse<Vec<CommitteeTagResponseDto>>),
        (status = 403, description = "Caller may not view this ticket"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "committee-tags"
)]
pub async fn list_tags(
    user: AuthenticatedUser,
    State(state): State<TagState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommitteeTagResponseDto>>>> {
    // Viewing tags requires viewing rights on the ticket itself
    state.ticket_service.get(&user, id).await?;

    let tags = state.committee_service.list_tags(id).await?;
    let items = tags.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Tag a committee onto a ticket (admin-level only)
#[utoipa::path(
    post,
    path = "/api/tickets/{id}/committee-tags",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    request_body = CreateCommitteeTagDto,
    responses(
        (status = 201, description = "Tag created", body = ApiResponse<CommitteeTagResponseDto>),
        (status = 400, description = "Duplicate tag"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Ticket or committee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "committee-tags"
)]
pub async fn create_tag(
    RequireAdmin(user): RequireAdmin,
    State(state): State<TagState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CreateCommitteeTagDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommitteeTagResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tag = state
        .committee_service
        .create_tag(id, dto.committee_id, user.id, dto.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(tag.into()),
            Some("Committee tagged".to_string()),
            None,
        )),
    ))
}

/// Remove a committee tag by tag id or committee id (admin-level only)
#[utoipa::path(
    delete,
    path = "/api/tickets/{id}/committee-tags",
    params(
        ("id" = i64, Path, description = "Ticket ID"),
        DeleteTagQuery
    ),
    responses(
        (status = 200, description = "Tag removed"),
        (status = 400, description = "Neither tag_id nor committee_id given"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Tag not found")
    ),
    security(("bearer_auth" = [])),
    tag = "committee-tags"
)]
pub async fn delete_tag(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<TagState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteTagQuery>,
) -> Result<Json<ApiResponse<()>>> {
    match (query.tag_id, query.committee_id) {
        (Some(tag_id), _) => {
            state
                .committee_service
                .delete_tag_by_id(id, tag_id)
                .await?;
        }
        (None, Some(committee_id)) => {
            state
                .committee_service
                .delete_tag_by_committee(id, committee_id)
                .await?;
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Provide tag_id or committee_id".to_string(),
            ));
        }
    }

    Ok(Json(ApiResponse::success(
        None,
        Some("Committee tag removed".to_string()),
        None,
    )))
}
