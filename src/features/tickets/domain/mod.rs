pub mod gate;
pub mod transition;

pub use gate::{authorize, AccessContext, Decision, Operation};
pub use transition::{plan_forward, plan_status_change, ForwardPlan, TransitionPlan};

#[cfg(test)]
mod scenario_tests {
    //! Gate + resolver walked together through the lifecycle scenarios the
    //! handlers implement.

    use super::*;
    use crate::features::tickets::models::{TicketCategory, TicketMetadata, TicketStatus};
    use crate::features::users::models::Role;
    use chrono::Utc;

    fn ctx(role: Role, status: TicketStatus) -> AccessContext {
        AccessContext {
            role,
            is_owner: false,
            is_assignee: false,
            is_tagged_committee: false,
            scope_match: false,
            category: TicketCategory::Hostel,
            status,
        }
    }

    #[test]
    fn student_reopens_their_resolved_ticket() {
        let ctx = AccessContext {
            is_owner: true,
            ..ctx(Role::Student, TicketStatus::Resolved)
        };

        let decision = authorize(&ctx, Operation::SetStatus(TicketStatus::Reopened));
        assert!(decision.is_allowed());

        let plan = plan_status_change(
            TicketStatus::Resolved,
            TicketStatus::Reopened,
            Role::Student,
            Utc::now(),
        );

        let mut metadata = TicketMetadata::new();
        metadata.reopen_count = 1;
        if plan.increment_reopen {
            metadata.reopen_count += 1;
        }

        assert_eq!(plan.new_status, TicketStatus::Reopened);
        assert_eq!(metadata.reopen_count, 2);
        assert!(plan.set_reopened_at.is_some());
        assert!(!plan.claim_by_actor);
    }

    #[test]
    fn tagged_committee_cannot_move_a_ticket_to_in_progress() {
        let ctx = AccessContext {
            is_tagged_committee: true,
            ..ctx(Role::Committee, TicketStatus::Open)
        };

        assert_eq!(
            authorize(&ctx, Operation::SetStatus(TicketStatus::InProgress)),
            Decision::Deny("Committee members can only close or resolve tickets")
        );
    }

    #[test]
    fn admin_forward_reassigns_to_the_committee_head() {
        let ctx = AccessContext {
            is_assignee: true,
            ..ctx(Role::Admin, TicketStatus::Open)
        };

        assert!(authorize(&ctx, Operation::Forward).is_allowed());

        let plan = plan_forward(TicketStatus::Open).unwrap();
        assert_eq!(plan.new_status, TicketStatus::Forwarded);
        assert!(plan.assign_to_head);
        assert!(plan.increment_forward);
    }

    #[test]
    fn super_admin_may_delete_what_admins_cannot() {
        let admin = AccessContext {
            is_assignee: true,
            ..ctx(Role::Admin, TicketStatus::Open)
        };
        let super_admin = ctx(Role::SuperAdmin, TicketStatus::Open);

        assert!(!authorize(&admin, Operation::Delete).is_allowed());
        assert!(authorize(&super_admin, Operation::Delete).is_allowed());
    }

    #[test]
    fn repeating_a_resolved_request_does_not_stack_side_effects() {
        let first = plan_status_change(
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            Role::Admin,
            Utc::now(),
        );
        assert!(first.changed);
        assert!(first.set_resolved_at.is_some());

        let second = plan_status_change(
            TicketStatus::Resolved,
            TicketStatus::Resolved,
            Role::Admin,
            Utc::now(),
        );
        assert!(!second.changed);
        assert!(second.set_resolved_at.is_none());
        assert!(!second.claim_by_actor);
    }
}
