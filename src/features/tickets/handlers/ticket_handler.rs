use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tickets::dtos::{
    CreateTicketDto, ForwardResponseDto, ForwardTicketDto, ForwardedToDto, TicketResponseDto,
    UpdateTicketStatusDto,
};
use crate::features::tickets::models::{CommentKind, TicketStatus};
use crate::features::tickets::services::{NewTicket, TicketService};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Create a ticket
#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn create_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketDto>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service
        .create(
            &user,
            NewTicket {
                category: dto.category,
                subcategory: dto.subcategory,
                location: dto.location,
                description: dto.description,
                group_id: dto.group_id,
                resolution_due: dto.resolution_due,
            },
        )
        .await?;

    let body = TicketResponseDto::for_viewer(ticket, user.is_admin_level());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(body),
            Some("Ticket created".to_string()),
            None,
        )),
    ))
}

/// List tickets visible to the caller
#[utoipa::path(
    get,
    path = "/api/tickets",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Tickets visible to the caller", body = ApiResponse<Vec<TicketResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn list_tickets(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<TicketResponseDto>>>> {
    let (tickets, total) = service
        .list(&user, pagination.offset(), pagination.limit())
        .await?;

    let staff = user.is_admin_level();
    let items = tickets
        .into_iter()
        .map(|t| TicketResponseDto::for_viewer(t, staff))
        .collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a ticket by ID
#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket found", body = ApiResponse<TicketResponseDto>),
        (status = 403, description = "Caller may not view this ticket"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn get_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    let ticket = service.get(&user, id).await?;
    let body = TicketResponseDto::for_viewer(ticket, user.is_admin_level());
    Ok(Json(ApiResponse::success(Some(body), None, None)))
}

/// Change a ticket's status and/or add a comment
#[utoipa::path(
    patch,
    path = "/api/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    request_body = UpdateTicketStatusDto,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Unknown status value or malformed body"),
        (status = 403, description = "Transition not permitted for this role"),
        (status = 404, description = "Ticket not found"),
        (status = 409, description = "Concurrent modification, retry")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn update_ticket_status(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateTicketStatusDto>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let requested = dto
        .status
        .as_deref()
        .map(TicketStatus::from_str)
        .transpose()
        .map_err(AppError::Validation)?;

    let comment_kind = parse_comment_kind(dto.comment_type.as_deref())?;

    let ticket = service
        .update_status(&user, id, requested, dto.comment, comment_kind)
        .await?;

    let body = TicketResponseDto::for_viewer(ticket, user.is_admin_level());
    Ok(Json(ApiResponse::success(Some(body), None, None)))
}

/// Forward a ticket to a committee
#[utoipa::path(
    post,
    path = "/api/tickets/{id}/forward",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    request_body = ForwardTicketDto,
    responses(
        (status = 200, description = "Ticket forwarded", body = ApiResponse<ForwardResponseDto>),
        (status = 400, description = "Ticket is already resolved"),
        (status = 403, description = "Only admins can forward"),
        (status = 404, description = "Ticket or committee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn forward_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ForwardTicketDto>,
) -> Result<Json<ApiResponse<ForwardResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (ticket, target) = service
        .forward(&user, id, dto.committee_id, dto.reason)
        .await?;

    let forwarded_to = ForwardedToDto::from_target(&target);
    let message = format!("Ticket forwarded to {}", target.committee_name);
    let body = ForwardResponseDto {
        ticket: TicketResponseDto::for_viewer(ticket, user.is_admin_level()),
        forwarded_to,
    };

    Ok(Json(ApiResponse::success(Some(body), Some(message), None)))
}

/// Delete a ticket (super admin only)
#[utoipa::path(
    delete,
    path = "/api/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket deleted"),
        (status = 403, description = "Only super admins can delete tickets"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn delete_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Ticket deleted".to_string()),
        None,
    )))
}

fn parse_comment_kind(comment_type: Option<&str>) -> Result<CommentKind> {
    match comment_type {
        None | Some("public") => Ok(CommentKind::Public),
        Some("internal") => Ok(CommentKind::Internal),
        Some(other) => Err(AppError::Validation(format!(
            "Unknown comment type '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_kind_parsing() {
        assert_eq!(parse_comment_kind(None).unwrap(), CommentKind::Public);
        assert_eq!(
            parse_comment_kind(Some("public")).unwrap(),
            CommentKind::Public
        );
        assert_eq!(
            parse_comment_kind(Some("internal")).unwrap(),
            CommentKind::Internal
        );
        assert!(parse_comment_kind(Some("secret")).is_err());
    }
}
