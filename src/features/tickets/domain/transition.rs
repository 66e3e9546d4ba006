//! The status transition resolver: given a permitted status change, compute
//! the persisted side effects as a plan. The gate has already decided
//! role-legality; the resolver owns idempotence, timestamps, counters, and
//! assignment claims. Pure, so every property is unit-testable.

use chrono::{DateTime, Utc};

use crate::features::tickets::models::TicketStatus;
use crate::features::users::models::Role;

/// What a status-setting operation must persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub new_status: TicketStatus,
    /// False when the requested status equals the current one; such a
    /// request is a state-wise no-op: no counters, no timestamps, no
    /// assignment change.
    pub changed: bool,
    pub set_resolved_at: Option<DateTime<Utc>>,
    pub set_reopened_at: Option<DateTime<Utc>>,
    pub increment_reopen: bool,
    /// Admin-level actors take assignment of every ticket they touch
    pub claim_by_actor: bool,
}

/// Resolve a status change into its plan.
pub fn plan_status_change(
    current: TicketStatus,
    requested: TicketStatus,
    actor_role: Role,
    now: DateTime<Utc>,
) -> TransitionPlan {
    if requested == current {
        return TransitionPlan {
            new_status: current,
            changed: false,
            set_resolved_at: None,
            set_reopened_at: None,
            increment_reopen: false,
            claim_by_actor: false,
        };
    }

    TransitionPlan {
        new_status: requested,
        changed: true,
        set_resolved_at: (requested == TicketStatus::Resolved).then_some(now),
        set_reopened_at: (requested == TicketStatus::Reopened).then_some(now),
        increment_reopen: requested == TicketStatus::Reopened,
        claim_by_actor: actor_role >= Role::Admin,
    }
}

/// What a forward operation must persist. Forward is not a plain status
/// set: it reassigns to the target committee's head and bumps the forward
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardPlan {
    pub new_status: TicketStatus,
    pub assign_to_head: bool,
    pub increment_forward: bool,
}

/// Forwarding an already-resolved ticket is rejected for every role.
pub fn plan_forward(current: TicketStatus) -> Result<ForwardPlan, &'static str> {
    if current == TicketStatus::Resolved {
        return Err("Cannot forward a resolved ticket");
    }

    Ok(ForwardPlan {
        new_status: TicketStatus::Forwarded,
        assign_to_head: true,
        increment_forward: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn resolving_sets_resolved_at() {
        let before = now();
        let plan =
            plan_status_change(TicketStatus::InProgress, TicketStatus::Resolved, Role::Admin, now());
        let after = now();

        assert!(plan.changed);
        assert_eq!(plan.new_status, TicketStatus::Resolved);
        let ts = plan.set_resolved_at.unwrap();
        assert!(ts >= before && ts <= after);
        assert!(plan.set_reopened_at.is_none());
        assert!(!plan.increment_reopen);
    }

    #[test]
    fn reopening_stamps_and_increments() {
        let plan =
            plan_status_change(TicketStatus::Resolved, TicketStatus::Reopened, Role::Student, now());

        assert!(plan.changed);
        assert!(plan.set_reopened_at.is_some());
        assert!(plan.increment_reopen);
        assert!(plan.set_resolved_at.is_none());
    }

    #[test]
    fn reapplying_the_current_status_is_a_no_op() {
        for status in [
            TicketStatus::Open,
            TicketStatus::Reopened,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            let plan = plan_status_change(status, status, Role::SuperAdmin, now());
            assert!(!plan.changed);
            assert!(plan.set_resolved_at.is_none());
            assert!(plan.set_reopened_at.is_none());
            assert!(!plan.increment_reopen);
            assert!(!plan.claim_by_actor);
        }
    }

    #[test]
    fn only_admin_level_actors_claim_assignment() {
        let target = TicketStatus::InProgress;
        for (role, expected) in [
            (Role::Student, false),
            (Role::Committee, false),
            (Role::Admin, true),
            (Role::SuperAdmin, true),
        ] {
            let plan = plan_status_change(TicketStatus::Open, target, role, now());
            assert_eq!(plan.claim_by_actor, expected, "role {role}");
        }
    }

    #[test]
    fn other_transitions_leave_counters_alone() {
        let plan = plan_status_change(
            TicketStatus::Open,
            TicketStatus::AwaitingStudentResponse,
            Role::Admin,
            now(),
        );
        assert!(plan.changed);
        assert!(!plan.increment_reopen);
        assert!(plan.set_resolved_at.is_none());
        assert!(plan.set_reopened_at.is_none());
    }

    #[test]
    fn forward_is_rejected_on_resolved_tickets() {
        assert!(plan_forward(TicketStatus::Resolved).is_err());
    }

    #[test]
    fn forward_moves_to_forwarded_and_reassigns() {
        for status in [
            TicketStatus::Open,
            TicketStatus::Reopened,
            TicketStatus::InProgress,
            TicketStatus::AwaitingStudentResponse,
            TicketStatus::Forwarded,
            TicketStatus::Closed,
        ] {
            let plan = plan_forward(status).unwrap();
            assert_eq!(plan.new_status, TicketStatus::Forwarded);
            assert!(plan.assign_to_head);
            assert!(plan.increment_forward);
        }
    }
}
