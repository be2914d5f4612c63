use serde_derive::{Deserialize, Serialize};
use crate::helper_model::RentalError;
use crate::model::{BookingStatus, PaymentStatus, PaymentType};

/// What the payment gateway reported for an order.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Failed,
    Refunded,
}

impl PaymentOutcome {
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            PaymentOutcome::Paid => PaymentStatus::Paid,
            PaymentOutcome::Failed => PaymentStatus::Failed,
            PaymentOutcome::Refunded => PaymentStatus::Refunded,
        }
    }
}

/// Status changes an admin may request from the back office.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Confirm,
    Complete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed {
        status: BookingStatus,
        payment_status: PaymentStatus,
    },
    /// The requested state is already in place. Duplicate gateway deliveries land here.
    Unchanged,
}

pub fn apply_payment_outcome(
    status: BookingStatus,
    payment_status: PaymentStatus,
    outcome: PaymentOutcome,
) -> Result<Transition, RentalError> {
    use BookingStatus as B;
    use PaymentStatus as P;
    match (status, payment_status, outcome) {
        (B::Confirmed, P::Paid, PaymentOutcome::Paid)
        | (B::Completed, P::Paid, PaymentOutcome::Paid)
        | (B::Cancelled, P::Failed, PaymentOutcome::Failed)
        | (B::Cancelled, P::Refunded, PaymentOutcome::Refunded) => Ok(Transition::Unchanged),
        // a customer may retry the same order after a declined attempt
        (B::Pending, P::Pending, PaymentOutcome::Paid)
        | (B::Cancelled, P::Failed, PaymentOutcome::Paid) => Ok(Transition::Changed {
            status: B::Confirmed,
            payment_status: P::Paid,
        }),
        (B::Pending, P::Pending, PaymentOutcome::Failed) => Ok(Transition::Changed {
            status: B::Cancelled,
            payment_status: P::Failed,
        }),
        (B::Confirmed, P::Paid, PaymentOutcome::Refunded)
        | (B::Completed, P::Paid, PaymentOutcome::Refunded)
        | (B::Cancelled, P::Paid, PaymentOutcome::Refunded) => Ok(Transition::Changed {
            status: B::Cancelled,
            payment_status: P::Refunded,
        }),
        _ => Err(RentalError::InvalidTransition),
    }
}

pub fn apply_admin_action(
    status: BookingStatus,
    payment_status: PaymentStatus,
    payment_type: PaymentType,
    action: AdminAction,
) -> Result<Transition, RentalError> {
    use BookingStatus as B;
    match (status, action) {
        (B::Confirmed, AdminAction::Confirm)
        | (B::Completed, AdminAction::Complete)
        | (B::Cancelled, AdminAction::Cancel) => Ok(Transition::Unchanged),
        // online bookings are only confirmed by the gateway
        (B::Pending, AdminAction::Confirm) if payment_type == PaymentType::OnArrival => {
            Ok(Transition::Changed { status: B::Confirmed, payment_status })
        }
        (B::Confirmed, AdminAction::Complete) => {
            Ok(Transition::Changed { status: B::Completed, payment_status })
        }
        (B::Pending, AdminAction::Cancel) | (B::Confirmed, AdminAction::Cancel) => {
            Ok(Transition::Changed { status: B::Cancelled, payment_status })
        }
        _ => Err(RentalError::InvalidTransition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_payment_confirms_pending_booking() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Pending, PaymentStatus::Pending, PaymentOutcome::Paid),
            Ok(Transition::Changed {
                status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Paid
            })
        );
    }

    #[test]
    fn refund_after_completed_rental_is_recorded() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Completed, PaymentStatus::Paid, PaymentOutcome::Refunded),
            Ok(Transition::Changed {
                status: BookingStatus::Cancelled,
                payment_status: PaymentStatus::Refunded
            })
        );
    }

    #[test]
    fn duplicate_success_callback_is_idempotent() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Confirmed, PaymentStatus::Paid, PaymentOutcome::Paid),
            Ok(Transition::Unchanged)
        );
    }

    #[test]
    fn failed_payment_cancels_pending_booking() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Pending, PaymentStatus::Pending, PaymentOutcome::Failed),
            Ok(Transition::Changed {
                status: BookingStatus::Cancelled,
                payment_status: PaymentStatus::Failed
            })
        );
    }

    #[test]
    fn retried_payment_after_decline_confirms() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Cancelled, PaymentStatus::Failed, PaymentOutcome::Paid),
            Ok(Transition::Changed {
                status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Paid
            })
        );
    }

    #[test]
    fn late_failure_after_payment_is_rejected() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Confirmed, PaymentStatus::Paid, PaymentOutcome::Failed),
            Err(RentalError::InvalidTransition)
        );
    }

    #[test]
    fn refund_cancels_confirmed_booking() {
        assert_eq!(
            apply_payment_outcome(BookingStatus::Confirmed, PaymentStatus::Paid, PaymentOutcome::Refunded),
            Ok(Transition::Changed {
                status: BookingStatus::Cancelled,
                payment_status: PaymentStatus::Refunded
            })
        );
        assert_eq!(
            apply_payment_outcome(BookingStatus::Pending, PaymentStatus::Pending, PaymentOutcome::Refunded),
            Err(RentalError::InvalidTransition)
        );
    }

    #[test]
    fn admin_completes_only_confirmed_bookings() {
        assert!(apply_admin_action(
            BookingStatus::Pending,
            PaymentStatus::Pending,
            PaymentType::Online,
            AdminAction::Complete
        )
        .is_err());
        assert_eq!(
            apply_admin_action(
                BookingStatus::Confirmed,
                PaymentStatus::Paid,
                PaymentType::Online,
                AdminAction::Complete
            ),
            Ok(Transition::Changed {
                status: BookingStatus::Completed,
                payment_status: PaymentStatus::Paid
            })
        );
    }

    #[test]
    fn admin_confirms_pay_on_arrival_only() {
        assert!(apply_admin_action(
            BookingStatus::Pending,
            PaymentStatus::Pending,
            PaymentType::Online,
            AdminAction::Confirm
        )
        .is_err());
        assert!(apply_admin_action(
            BookingStatus::Pending,
            PaymentStatus::Pending,
            PaymentType::OnArrival,
            AdminAction::Confirm
        )
        .is_ok());
    }

    #[test]
    fn completed_bookings_cannot_be_cancelled() {
        assert_eq!(
            apply_admin_action(
                BookingStatus::Completed,
                PaymentStatus::Paid,
                PaymentType::Online,
                AdminAction::Cancel
            ),
            Err(RentalError::InvalidTransition)
        );
    }
}
