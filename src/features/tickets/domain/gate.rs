//! The access control gate: a pure decision over the acting role, its
//! relationship to the ticket, and the requested operation. All I/O
//! (ownership, tag membership, scope lookups) happens before this point;
//! the gate itself never touches the store, which keeps the precedence
//! table directly testable.

use crate::features::tickets::models::{TicketCategory, TicketStatus};
use crate::features::users::models::Role;

/// Operations a caller can request against a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Comment,
    SetStatus(TicketStatus),
    Forward,
    Delete,
}

/// Everything the gate needs to know, resolved ahead of time.
#[derive(Debug, Clone, Copy)]
pub struct AccessContext {
    pub role: Role,
    /// The acting user created the ticket
    pub is_owner: bool,
    /// ticket.assigned_to is the acting user
    pub is_assignee: bool,
    /// A committee tag links the ticket to a committee the actor belongs to
    pub is_tagged_committee: bool,
    /// One of the admin's scope assignments covers the ticket
    pub scope_match: bool,
    pub category: TicketCategory,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Evaluate the precedence table: super_admin, then admin, then committee,
/// then student. Each arm is self-contained; there is no fall-through
/// between roles.
pub fn authorize(ctx: &AccessContext, op: Operation) -> Decision {
    match ctx.role {
        Role::SuperAdmin => Decision::Allow,
        Role::Admin => authorize_admin(ctx, op),
        Role::Committee => authorize_committee(ctx, op),
        Role::Student => authorize_student(ctx, op),
    }
}

fn authorize_admin(ctx: &AccessContext, op: Operation) -> Decision {
    if !ctx.is_assignee && !ctx.scope_match {
        return Decision::Deny("Ticket is outside your assigned scope");
    }

    match op {
        Operation::Delete => Decision::Deny("Only super admins can delete tickets"),
        Operation::View
        | Operation::Comment
        | Operation::SetStatus(_)
        | Operation::Forward => Decision::Allow,
    }
}

fn authorize_committee(ctx: &AccessContext, op: Operation) -> Decision {
    let owns = ctx.category == TicketCategory::Committee && ctx.is_owner;

    if owns {
        // A committee member acting on their own submission has creator
        // rights, same as a student on their own ticket.
        return authorize_owner(ctx, op);
    }

    if !ctx.is_tagged_committee {
        return Decision::Deny("Ticket is not tagged to your committee");
    }

    match op {
        Operation::View | Operation::Comment => Decision::Allow,
        Operation::SetStatus(target) if target.is_terminal() => Decision::Allow,
        Operation::SetStatus(_) => {
            Decision::Deny("Committee members can only close or resolve tickets")
        }
        Operation::Forward => Decision::Deny("Committee members cannot forward tickets"),
        Operation::Delete => Decision::Deny("Only super admins can delete tickets"),
    }
}

fn authorize_student(ctx: &AccessContext, op: Operation) -> Decision {
    if !ctx.is_owner {
        return Decision::Deny("Only the ticket creator can access this ticket");
    }

    authorize_owner(ctx, op)
}

/// Creator rights: view always; reopen once terminal; comment while a
/// response is requested.
fn authorize_owner(ctx: &AccessContext, op: Operation) -> Decision {
    match op {
        Operation::View => Decision::Allow,
        Operation::SetStatus(TicketStatus::Reopened) => {
            if ctx.status.is_terminal() {
                Decision::Allow
            } else {
                Decision::Deny("Tickets can only be reopened once resolved or closed")
            }
        }
        Operation::SetStatus(_) => {
            Decision::Deny("Ticket creators can only reopen resolved tickets")
        }
        Operation::Comment => {
            if ctx.status == TicketStatus::AwaitingStudentResponse {
                Decision::Allow
            } else {
                Decision::Deny("Comments are only accepted while a response is requested")
            }
        }
        Operation::Forward => Decision::Deny("Only admins can forward tickets"),
        Operation::Delete => Decision::Deny("Only super admins can delete tickets"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [TicketStatus; 7] = [
        TicketStatus::Open,
        TicketStatus::Reopened,
        TicketStatus::InProgress,
        TicketStatus::AwaitingStudentResponse,
        TicketStatus::Forwarded,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

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
    fn super_admin_is_allowed_everything() {
        for status in ALL_STATUSES {
            let c = ctx(Role::SuperAdmin, status);
            for op in [
                Operation::View,
                Operation::Comment,
                Operation::Forward,
                Operation::Delete,
                Operation::SetStatus(TicketStatus::Closed),
            ] {
                assert!(authorize(&c, op).is_allowed());
            }
        }
    }

    #[test]
    fn admin_needs_assignment_or_scope() {
        let c = ctx(Role::Admin, TicketStatus::Open);
        assert!(!authorize(&c, Operation::View).is_allowed());

        let assigned = AccessContext {
            is_assignee: true,
            ..c
        };
        assert!(authorize(&assigned, Operation::View).is_allowed());
        assert!(authorize(&assigned, Operation::Forward).is_allowed());
        assert!(
            authorize(&assigned, Operation::SetStatus(TicketStatus::InProgress)).is_allowed()
        );

        let in_scope = AccessContext {
            scope_match: true,
            ..c
        };
        assert!(authorize(&in_scope, Operation::View).is_allowed());
    }

    #[test]
    fn admin_may_set_any_status() {
        let c = AccessContext {
            is_assignee: true,
            ..ctx(Role::Admin, TicketStatus::Closed)
        };
        for target in ALL_STATUSES {
            assert!(authorize(&c, Operation::SetStatus(target)).is_allowed());
        }
    }

    #[test]
    fn admin_cannot_delete() {
        let c = AccessContext {
            is_assignee: true,
            scope_match: true,
            ..ctx(Role::Admin, TicketStatus::Open)
        };
        assert_eq!(
            authorize(&c, Operation::Delete),
            Decision::Deny("Only super admins can delete tickets")
        );
    }

    #[test]
    fn student_denied_on_tickets_they_did_not_create() {
        let c = ctx(Role::Student, TicketStatus::Resolved);
        for op in [
            Operation::View,
            Operation::Comment,
            Operation::SetStatus(TicketStatus::Reopened),
        ] {
            assert!(!authorize(&c, op).is_allowed());
        }
    }

    #[test]
    fn student_owner_can_only_reopen_from_terminal_states() {
        for status in ALL_STATUSES {
            let c = AccessContext {
                is_owner: true,
                ..ctx(Role::Student, status)
            };
            let decision = authorize(&c, Operation::SetStatus(TicketStatus::Reopened));
            assert_eq!(decision.is_allowed(), status.is_terminal(), "status {status}");
        }
    }

    #[test]
    fn student_owner_denied_every_other_target_status() {
        let c = AccessContext {
            is_owner: true,
            ..ctx(Role::Student, TicketStatus::Resolved)
        };
        for target in ALL_STATUSES {
            if target == TicketStatus::Reopened {
                continue;
            }
            assert!(!authorize(&c, Operation::SetStatus(target)).is_allowed());
        }
    }

    #[test]
    fn student_comments_only_while_awaiting_response() {
        for status in ALL_STATUSES {
            let c = AccessContext {
                is_owner: true,
                ..ctx(Role::Student, status)
            };
            let expected = status == TicketStatus::AwaitingStudentResponse;
            assert_eq!(authorize(&c, Operation::Comment).is_allowed(), expected);
        }
    }

    #[test]
    fn tagged_committee_can_view_comment_and_close_only() {
        let c = AccessContext {
            is_tagged_committee: true,
            ..ctx(Role::Committee, TicketStatus::Open)
        };

        assert!(authorize(&c, Operation::View).is_allowed());
        assert!(authorize(&c, Operation::Comment).is_allowed());
        assert!(authorize(&c, Operation::SetStatus(TicketStatus::Resolved)).is_allowed());
        assert!(authorize(&c, Operation::SetStatus(TicketStatus::Closed)).is_allowed());

        assert_eq!(
            authorize(&c, Operation::SetStatus(TicketStatus::InProgress)),
            Decision::Deny("Committee members can only close or resolve tickets")
        );
        assert!(!authorize(&c, Operation::Forward).is_allowed());
        assert!(!authorize(&c, Operation::Delete).is_allowed());
    }

    #[test]
    fn untagged_committee_is_denied() {
        let c = ctx(Role::Committee, TicketStatus::Open);
        assert_eq!(
            authorize(&c, Operation::View),
            Decision::Deny("Ticket is not tagged to your committee")
        );
    }

    #[test]
    fn committee_owner_of_committee_ticket_has_creator_rights() {
        let c = AccessContext {
            is_owner: true,
            category: TicketCategory::Committee,
            ..ctx(Role::Committee, TicketStatus::Resolved)
        };
        assert!(authorize(&c, Operation::View).is_allowed());
        assert!(authorize(&c, Operation::SetStatus(TicketStatus::Reopened)).is_allowed());
        // Creator rights, not tagged-committee rights: no resolving own ticket
        assert!(!authorize(&c, Operation::SetStatus(TicketStatus::Resolved)).is_allowed());
    }

    #[test]
    fn committee_owner_of_non_committee_ticket_needs_a_tag() {
        // Creating a hostel ticket does not give a committee member owner
        // rights through the committee arm; ownership only counts for
        // category=committee submissions.
        let c = AccessContext {
            is_owner: true,
            category: TicketCategory::Hostel,
            ..ctx(Role::Committee, TicketStatus::Open)
        };
        assert!(!authorize(&c, Operation::View).is_allowed());
    }
}
