use crate::errors::{AppError, AppResult};
use crate::models::BookingStatus;

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The customer who owns the booking.
    Requester,
    /// Operations staff.
    Operations,
}

/// Statuses reachable in one step from `current`.
pub fn allowed_transitions(current: BookingStatus) -> &'static [BookingStatus] {
    match current {
        BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
        BookingStatus::Confirmed => &[BookingStatus::Ongoing, BookingStatus::Cancelled],
        BookingStatus::Ongoing => &[BookingStatus::Completed, BookingStatus::Cancelled],
        BookingStatus::Completed => &[],
        BookingStatus::Cancelled => &[],
    }
}

pub fn is_terminal(status: BookingStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Validates a move from `current` to `requested` against the transition
/// table. Re-requesting the current status is rejected.
pub fn transition(current: BookingStatus, requested: BookingStatus) -> AppResult<BookingStatus> {
    if allowed_transitions(current).contains(&requested) {
        Ok(requested)
    } else {
        Err(AppError::InvalidTransition {
            from: current,
            to: requested,
        })
    }
}

/// Whether `actor` may cancel a booking currently in `current`. Requesters
/// lose the right once the booking is underway.
pub fn may_cancel(actor: Actor, current: BookingStatus) -> bool {
    match actor {
        Actor::Requester => matches!(current, BookingStatus::Pending | BookingStatus::Confirmed),
        Actor::Operations => true,
    }
}

/// Cancellation through the transition table, narrowed by the actor policy.
pub fn cancel(actor: Actor, current: BookingStatus) -> AppResult<BookingStatus> {
    if !may_cancel(actor, current) {
        return Err(AppError::InvalidTransition {
            from: current,
            to: BookingStatus::Cancelled,
        });
    }
    transition(current, BookingStatus::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[(BookingStatus, BookingStatus)] = &[
        (BookingStatus::Pending, BookingStatus::Confirmed),
        (BookingStatus::Pending, BookingStatus::Cancelled),
        (BookingStatus::Confirmed, BookingStatus::Ongoing),
        (BookingStatus::Confirmed, BookingStatus::Cancelled),
        (BookingStatus::Ongoing, BookingStatus::Completed),
        (BookingStatus::Ongoing, BookingStatus::Cancelled),
    ];

    #[test]
    fn test_every_pair_matches_the_table() {
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                let result = transition(from, to);
                if TABLE.contains(&(from, to)) {
                    assert_eq!(result.unwrap(), to, "{from} -> {to} should succeed");
                } else {
                    match result {
                        Err(AppError::InvalidTransition { from: f, to: t }) => {
                            assert_eq!((f, t), (from, to));
                        }
                        other => panic!("{from} -> {to} should fail, got {other:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_status_is_rejected() {
        for status in BookingStatus::ALL {
            assert!(transition(status, status).is_err());
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal(BookingStatus::Completed));
        assert!(is_terminal(BookingStatus::Cancelled));
        assert!(!is_terminal(BookingStatus::Pending));
        assert!(!is_terminal(BookingStatus::Confirmed));
        assert!(!is_terminal(BookingStatus::Ongoing));
    }

    #[test]
    fn test_requester_cancellation_policy() {
        assert_eq!(
            cancel(Actor::Requester, BookingStatus::Pending).unwrap(),
            BookingStatus::Cancelled
        );
        assert_eq!(
            cancel(Actor::Requester, BookingStatus::Confirmed).unwrap(),
            BookingStatus::Cancelled
        );
        assert!(matches!(
            cancel(Actor::Requester, BookingStatus::Ongoing),
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(cancel(Actor::Requester, BookingStatus::Completed).is_err());
        assert!(cancel(Actor::Requester, BookingStatus::Cancelled).is_err());
    }

    #[test]
    fn test_operations_may_cancel_ongoing() {
        assert_eq!(
            cancel(Actor::Operations, BookingStatus::Ongoing).unwrap(),
            BookingStatus::Cancelled
        );
        // The table still forbids leaving a terminal state.
        assert!(cancel(Actor::Operations, BookingStatus::Completed).is_err());
    }

    #[test]
    fn test_invalid_transition_message_names_both_states() {
        let err = transition(BookingStatus::Pending, BookingStatus::Ongoing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status transition from pending to ongoing"
        );
    }
}
