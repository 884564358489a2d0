//! Transition rules for delivery assignments.

use chrono::NaiveDate;

use crate::assignment::error::AssignmentTransitionError;
use crate::assignment::types::{AssignmentAction, AssignmentStatus};

/// Stateless transition rules.
///
/// Each function checks the current status and returns the action to apply.
pub struct AssignmentTransitions;

impl AssignmentTransitions {
    /// Marks a scheduled assignment as delivered on `completed_date`.
    pub fn complete(
        current: AssignmentStatus,
        completed_date: NaiveDate,
    ) -> Result<AssignmentAction, AssignmentTransitionError> {
        match current {
            AssignmentStatus::Scheduled => Ok(AssignmentAction::Complete {
                new_status: AssignmentStatus::Completed,
                completed_date,
            }),
            _ => Err(AssignmentTransitionError::InvalidTransition {
                from: current,
                to: AssignmentStatus::Completed,
            }),
        }
    }

    /// Cancels a scheduled assignment.
    pub fn cancel(current: AssignmentStatus) -> Result<AssignmentAction, AssignmentTransitionError> {
        match current {
            AssignmentStatus::Scheduled => Ok(AssignmentAction::Cancel {
                new_status: AssignmentStatus::Cancelled,
            }),
            _ => Err(AssignmentTransitionError::InvalidTransition {
                from: current,
                to: AssignmentStatus::Cancelled,
            }),
        }
    }

    /// Moves an assignment to a new date. Cancelled assignments are revived.
    pub fn reschedule(
        current: AssignmentStatus,
        scheduled_date: NaiveDate,
    ) -> Result<AssignmentAction, AssignmentTransitionError> {
        match current {
            AssignmentStatus::Scheduled | AssignmentStatus::Cancelled => {
                Ok(AssignmentAction::Reschedule {
                    new_status: AssignmentStatus::Scheduled,
                    scheduled_date,
                })
            }
            AssignmentStatus::Completed => Err(AssignmentTransitionError::InvalidTransition {
                from: current,
                to: AssignmentStatus::Scheduled,
            }),
        }
    }

    /// Resolves a requested target status into an action.
    ///
    /// `date` is the completion date for `completed` and the new target date
    /// for `scheduled`; `today` is used when completing without a date.
    pub fn to_status(
        current: AssignmentStatus,
        target: AssignmentStatus,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Option<AssignmentAction>, AssignmentTransitionError> {
        match target {
            AssignmentStatus::Completed => {
                Self::complete(current, date.unwrap_or(today)).map(Some)
            }
            AssignmentStatus::Cancelled => Self::cancel(current).map(Some),
            AssignmentStatus::Scheduled => match date {
                Some(d) => Self::reschedule(current, d).map(Some),
                None if current == AssignmentStatus::Scheduled => Ok(None),
                None => Err(AssignmentTransitionError::InvalidTransition {
                    from: current,
                    to: AssignmentStatus::Scheduled,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_complete_scheduled() {
        let action = AssignmentTransitions::complete(AssignmentStatus::Scheduled, day(4)).unwrap();
        assert_eq!(
            action,
            AssignmentAction::Complete {
                new_status: AssignmentStatus::Completed,
                completed_date: day(4)
            }
        );
    }

    #[test]
    fn test_cannot_complete_cancelled() {
        let err = AssignmentTransitions::complete(AssignmentStatus::Cancelled, day(4)).unwrap_err();
        assert_eq!(
            err,
            AssignmentTransitionError::InvalidTransition {
                from: AssignmentStatus::Cancelled,
                to: AssignmentStatus::Completed
            }
        );
    }

    #[test]
    fn test_cancel_only_from_scheduled() {
        assert!(AssignmentTransitions::cancel(AssignmentStatus::Scheduled).is_ok());
        assert!(AssignmentTransitions::cancel(AssignmentStatus::Completed).is_err());
        assert!(AssignmentTransitions::cancel(AssignmentStatus::Cancelled).is_err());
    }

    #[test]
    fn test_reschedule_revives_cancelled() {
        let action =
            AssignmentTransitions::reschedule(AssignmentStatus::Cancelled, day(9)).unwrap();
        assert_eq!(action.new_status(), AssignmentStatus::Scheduled);
    }

    #[test]
    fn test_to_status_defaults_completion_to_today() {
        let action = AssignmentTransitions::to_status(
            AssignmentStatus::Scheduled,
            AssignmentStatus::Completed,
            None,
            day(20),
        )
        .unwrap();
        assert_eq!(
            action,
            Some(AssignmentAction::Complete {
                new_status: AssignmentStatus::Completed,
                completed_date: day(20)
            })
        );
    }

    #[test]
    fn test_to_status_scheduled_without_date_is_noop() {
        let action = AssignmentTransitions::to_status(
            AssignmentStatus::Scheduled,
            AssignmentStatus::Scheduled,
            None,
            day(1),
        )
        .unwrap();
        assert_eq!(action, None);

        assert!(
            AssignmentTransitions::to_status(
                AssignmentStatus::Cancelled,
                AssignmentStatus::Scheduled,
                None,
                day(1),
            )
            .is_err()
        );
    }

    fn status_strategy() -> impl Strategy<Value = AssignmentStatus> {
        prop_oneof![
            Just(AssignmentStatus::Scheduled),
            Just(AssignmentStatus::Completed),
            Just(AssignmentStatus::Cancelled),
        ]
    }

    proptest! {
        /// Completed assignments accept no transition at all.
        #[test]
        fn prop_completed_is_final(target in status_strategy(), d in 1u32..28) {
            let result = AssignmentTransitions::to_status(
                AssignmentStatus::Completed,
                target,
                Some(day(d)),
                day(1),
            );
            prop_assert!(result.is_err());
        }

        /// Every successful action lands on the requested status.
        #[test]
        fn prop_action_matches_target(
            current in status_strategy(),
            target in status_strategy(),
            d in 1u32..28,
        ) {
            if let Ok(Some(action)) =
                AssignmentTransitions::to_status(current, target, Some(day(d)), day(1))
            {
                prop_assert_eq!(action.new_status(), target);
            }
        }
    }
}
