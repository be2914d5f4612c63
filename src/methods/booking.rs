use chrono::Utc;
use diesel::prelude::*;
use rand::Rng;
use rust_decimal::Decimal;
use crate::helper_model::{BookingDetail, RentalError};
use crate::methods::booking_status::{self, PaymentOutcome, Transition};
use crate::methods::customer::normalize_email;
use crate::methods::payment_gateway;
use crate::{POOL, config, model};

const INVOICE_PREFIX: &str = "RC";
const INVOICE_CHARSET: &[u8] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";

fn random_invoice_number() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..8)
        .map(|_| {
            let idx = rng.random_range(0..INVOICE_CHARSET.len());
            INVOICE_CHARSET[idx] as char
        })
        .collect();
    format!("{}{}", INVOICE_PREFIX, suffix)
}

pub fn generate_unique_invoice_number(conn: &mut PgConnection) -> Result<String, RentalError> {
    use crate::schema::bookings::dsl::*;
    loop {
        let candidate = random_invoice_number();
        let exists = diesel::select(diesel::dsl::exists(
            bookings.filter(invoice_number.eq(&candidate))
        ))
            .get_result::<bool>(conn)?;
        if !exists {
            return Ok(candidate);
        }
    }
}

/// True when `email` belongs to the booking's customer.
pub fn email_matches(customer_email: &str, email: &str) -> bool {
    normalize_email(customer_email) == normalize_email(email)
}

pub fn load_booking_detail(conn: &mut PgConnection, booking: model::Booking) -> Result<BookingDetail, RentalError> {
    use crate::schema::booking_options::dsl as bo_q;
    use crate::schema::vehicles::dsl as v_q;
    let vehicle = v_q::vehicles
        .find(booking.vehicle_id)
        .get_result::<model::Vehicle>(conn)?;
    let options = bo_q::booking_options
        .filter(bo_q::booking_id.eq(booking.id))
        .load::<model::BookingOption>(conn)?;
    Ok(BookingDetail { booking, vehicle, options })
}

/// Finds a booking by invoice number, visible only when `email` is the
/// customer's. A mismatch is reported exactly like a missing booking.
pub fn lookup_booking(conn: &mut PgConnection, invoice: &str, email: &str) -> Result<BookingDetail, RentalError> {
    use crate::schema::bookings::dsl as b_q;
    use crate::schema::customers::dsl as c_q;
    let (booking, customer) = b_q::bookings
        .inner_join(c_q::customers)
        .filter(b_q::invoice_number.eq(invoice.trim().to_uppercase()))
        .first::<(model::Booking, model::Customer)>(conn)?;
    if !email_matches(&customer.email, email) {
        return Err(RentalError::NotFound);
    }
    load_booking_detail(conn, booking)
}

pub fn find_by_order_or_invoice(conn: &mut PgConnection, reference: &str) -> Result<model::Booking, RentalError> {
    use crate::schema::bookings::dsl::*;
    let booking = bookings
        .filter(order_id.eq(reference).or(invoice_number.eq(reference)))
        .first::<model::Booking>(conn)?;
    Ok(booking)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackResult {
    /// The event id was processed before; nothing was written.
    Duplicate,
    Applied {
        booking: model::Booking,
        transition: Transition,
    },
}

pub struct PaymentEvent<'a> {
    pub event_id: Option<&'a str>,
    pub source: &'a str,
    pub outcome: PaymentOutcome,
    pub amount: Option<Decimal>,
    pub payload: serde_json::Value,
}

/// What recording one gateway event against a locked booking amounts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPlan {
    Duplicate,
    Apply {
        transition: Transition,
        write_log: bool,
    },
}

/// Paid outcomes must match the booking total whenever the gateway reports an amount.
pub fn check_paid_amount(outcome: PaymentOutcome, total: Decimal, reported: Option<Decimal>) -> Result<(), RentalError> {
    match (outcome, reported) {
        (PaymentOutcome::Paid, Some(amount)) if amount != total => Err(RentalError::AmountMismatch),
        _ => Ok(()),
    }
}

/// Decides how an event is applied to `booking`, which the caller holds locked.
/// `seen` tells whether the event id is already in the payment log. Polls
/// carry no event id and are only logged when they change the booking.
pub fn plan_payment_event(booking: &model::Booking, seen: bool, event: &PaymentEvent<'_>) -> Result<EventPlan, RentalError> {
    if seen {
        return Ok(EventPlan::Duplicate);
    }
    let transition = booking_status::apply_payment_outcome(
        booking.status,
        booking.payment_status,
        event.outcome,
    )?;
    if let Transition::Changed { .. } = transition {
        check_paid_amount(event.outcome, booking.total_price, event.amount)?;
    }
    let write_log = event.event_id.is_some() || transition != Transition::Unchanged;
    Ok(EventPlan::Apply { transition, write_log })
}

/// Applies a gateway outcome to `booking_id` and appends the payment log, in one transaction.
/// The booking row is locked before the event id is checked, so concurrent
/// deliveries of one event are serialised and the later one sees the first.
pub fn record_payment_event(
    conn: &mut PgConnection,
    booking_id: i32,
    event: PaymentEvent<'_>,
) -> Result<CallbackResult, RentalError> {
    use crate::schema::bookings::dsl as b_q;
    use crate::schema::payment_logs::dsl as pl_q;
    conn.transaction::<_, RentalError, _>(|conn| {
        let booking = b_q::bookings
            .find(booking_id)
            .for_update()
            .get_result::<model::Booking>(conn)?;
        let seen = match event.event_id {
            Some(event_ref) => diesel::select(diesel::dsl::exists(
                pl_q::payment_logs.filter(pl_q::event_id.eq(event_ref))
            ))
                .get_result::<bool>(conn)?,
            None => false,
        };
        let (transition, write_log) = match plan_payment_event(&booking, seen, &event) {
            Ok(EventPlan::Duplicate) => return Ok(CallbackResult::Duplicate),
            Ok(EventPlan::Apply { transition, write_log }) => (transition, write_log),
            Err(RentalError::AmountMismatch) => {
                tracing::warn!(
                    "booking {} totals {} but the gateway reported {:?}; payment not applied",
                    booking.invoice_number, booking.total_price, event.amount
                );
                return Err(RentalError::AmountMismatch);
            }
            Err(err) => return Err(err),
        };
        let booking = match transition {
            Transition::Changed { status, payment_status } => {
                diesel::update(b_q::bookings.find(booking.id))
                    .set((
                        b_q::status.eq(status),
                        b_q::payment_status.eq(payment_status),
                        b_q::updated_at.eq(Utc::now()),
                    ))
                    .get_result::<model::Booking>(conn)?
            }
            Transition::Unchanged => booking,
        };
        if write_log {
            diesel::insert_into(pl_q::payment_logs)
                .values(&model::NewPaymentLog {
                    booking_id: booking.id,
                    event_id: event.event_id.map(String::from),
                    source: event.source.to_string(),
                    payment_status: event.outcome.payment_status(),
                    amount: event.amount,
                    payload: event.payload,
                })
                .execute(conn)?;
        }
        Ok(CallbackResult::Applied { booking, transition })
    })
}

/// Polls the gateway for the booking's order and applies a settled outcome.
/// A still-pending order leaves the booking as it is.
pub async fn sync_with_gateway(booking: model::Booking, source: &str) -> Result<model::Booking, RentalError> {
    let order_id = booking.order_id.clone().ok_or(RentalError::InputDataError)?;
    let gateway = config::GatewayConfig::from_env()?;
    let order = payment_gateway::fetch_order_status(&gateway, &order_id).await?;
    let Some(outcome) = order.status.outcome() else {
        tracing::info!("order {} for {} is still pending", order_id, booking.invoice_number);
        return Ok(booking);
    };
    let payload = serde_json::to_value(&order).map_err(|_| RentalError::InternalServerError)?;
    let mut pool = POOL.get()?;
    let result = record_payment_event(
        &mut pool,
        booking.id,
        PaymentEvent {
            event_id: None,
            source,
            outcome,
            amount: order.amount,
            payload,
        },
    )?;
    match result {
        CallbackResult::Applied { booking, transition } => {
            if let Transition::Changed { status, payment_status } = transition {
                tracing::info!(
                    "booking {} moved to {:?}/{:?} after polling the gateway",
                    booking.invoice_number, status, payment_status
                );
            }
            Ok(booking)
        }
        CallbackResult::Duplicate => Ok(booking),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookingStatus, PaymentStatus, PaymentType};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn booking(status: BookingStatus, payment_status: PaymentStatus) -> model::Booking {
        let now = Utc::now();
        model::Booking {
            id: 7,
            invoice_number: String::from("RC7K3M9P2Q"),
            order_id: Some(String::from("ORD-7")),
            customer_id: 3,
            vehicle_id: 11,
            pickup_location_id: 1,
            drop_off_location_id: 1,
            pickup_time: now,
            drop_off_time: now + chrono::Duration::days(4),
            season_id: 2,
            daily_rate: dec("45.00"),
            total_price: dec("180.00"),
            promo_code: None,
            status,
            payment_status,
            payment_type: PaymentType::Online,
            created_at: now,
            updated_at: now,
        }
    }

    fn event(event_id: Option<&str>, outcome: PaymentOutcome, amount: Option<Decimal>) -> PaymentEvent<'_> {
        PaymentEvent {
            event_id,
            source: "webhook",
            outcome,
            amount,
            payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn redelivered_event_is_a_duplicate_without_a_log_row() {
        let confirmed = booking(BookingStatus::Confirmed, PaymentStatus::Paid);
        let paid = event(Some("evt_1"), PaymentOutcome::Paid, Some(dec("180.00")));
        assert_eq!(plan_payment_event(&confirmed, true, &paid), Ok(EventPlan::Duplicate));
    }

    #[test]
    fn first_delivery_confirms_and_logs() {
        let pending = booking(BookingStatus::Pending, PaymentStatus::Pending);
        let paid = event(Some("evt_1"), PaymentOutcome::Paid, Some(dec("180")));
        assert_eq!(
            plan_payment_event(&pending, false, &paid),
            Ok(EventPlan::Apply {
                transition: Transition::Changed {
                    status: BookingStatus::Confirmed,
                    payment_status: PaymentStatus::Paid,
                },
                write_log: true,
            })
        );
    }

    #[test]
    fn paid_order_for_a_different_amount_is_refused() {
        let pending = booking(BookingStatus::Pending, PaymentStatus::Pending);
        let cheap = event(None, PaymentOutcome::Paid, Some(dec("19.99")));
        assert_eq!(plan_payment_event(&pending, false, &cheap), Err(RentalError::AmountMismatch));
        assert_eq!(
            check_paid_amount(PaymentOutcome::Paid, dec("180.00"), None),
            Ok(())
        );
        assert_eq!(
            check_paid_amount(PaymentOutcome::Refunded, dec("180.00"), Some(dec("50.00"))),
            Ok(())
        );
    }

    #[test]
    fn unchanged_poll_is_not_logged() {
        let confirmed = booking(BookingStatus::Confirmed, PaymentStatus::Paid);
        let poll = event(None, PaymentOutcome::Paid, Some(dec("180.00")));
        assert_eq!(
            plan_payment_event(&confirmed, false, &poll),
            Ok(EventPlan::Apply { transition: Transition::Unchanged, write_log: false })
        );
    }

    #[test]
    fn invoice_numbers_have_prefix_and_length() {
        let invoice = random_invoice_number();
        assert!(invoice.starts_with(INVOICE_PREFIX));
        assert_eq!(invoice.len(), 10);
        assert!(invoice[2..].bytes().all(|b| INVOICE_CHARSET.contains(&b)));
    }

    #[test]
    fn lookup_email_match_ignores_case_and_spaces() {
        assert!(email_matches("anna@example.com", " Anna@Example.com "));
    }

    #[test]
    fn lookup_email_mismatch_is_rejected() {
        assert!(!email_matches("anna@example.com", "boris@example.com"));
    }
}
