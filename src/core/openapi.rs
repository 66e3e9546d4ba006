use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::committees::{dtos as committees_dtos, handlers as committees_handlers};
use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::user_handler::get_me,
        users_handlers::user_handler::update_role,
        // Tickets
        tickets_handlers::ticket_handler::create_ticket,
        tickets_handlers::ticket_handler::list_tickets,
        tickets_handlers::ticket_handler::get_ticket,
        tickets_handlers::ticket_handler::update_ticket_status,
        tickets_handlers::ticket_handler::forward_ticket,
        tickets_handlers::ticket_handler::delete_ticket,
        // Committee tags
        committees_handlers::tag_handler::list_tags,
        committees_handlers::tag_handler::create_tag,
        committees_handlers::tag_handler::delete_tag,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth / users
            auth::model::AuthenticatedUser,
            users_models::Role,
            users_dtos::UserResponseDto,
            users_dtos::UpdateRoleDto,
            ApiResponse<auth::model::AuthenticatedUser>,
            ApiResponse<users_dtos::UserResponseDto>,
            // Tickets
            tickets_models::TicketCategory,
            tickets_models::TicketStatus,
            tickets_models::StatusInfo,
            tickets_models::Comment,
            tickets_models::CommentKind,
            tickets_models::CommentSource,
            tickets_dtos::CreateTicketDto,
            tickets_dtos::UpdateTicketStatusDto,
            tickets_dtos::ForwardTicketDto,
            tickets_dtos::TicketResponseDto,
            tickets_dtos::ForwardedToDto,
            tickets_dtos::ForwardResponseDto,
            ApiResponse<tickets_dtos::TicketResponseDto>,
            ApiResponse<Vec<tickets_dtos::TicketResponseDto>>,
            ApiResponse<tickets_dtos::ForwardResponseDto>,
            // Committee tags
            committees_dtos::CommitteeDto,
            committees_dtos::CommitteeTagResponseDto,
            committees_dtos::CreateCommitteeTagDto,
            ApiResponse<committees_dtos::CommitteeTagResponseDto>,
            ApiResponse<Vec<committees_dtos::CommitteeTagResponseDto>>,
        )
    ),
    tags(
        (name = "users", description = "Identity and role management"),
        (name = "tickets", description = "Ticket lifecycle: create, view, transition, forward, delete"),
        (name = "committee-tags", description = "Committee tags granting action rights on tickets"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Helpdesk API",
        version = "0.1.0",
        description = "API documentation for the helpdesk service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
