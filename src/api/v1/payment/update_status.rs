use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::{PaymentState, RentalError};
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct UpdateStatusData {
    invoice_number: String,
    order_id: String,
}

fn link_error(err: DieselError) -> RentalError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => RentalError::OrderAlreadyLinked,
        other => RentalError::from(other),
    }
}

/// Stores the gateway order id on the booking. The first id recorded is kept.
fn attach_order(conn: &mut PgConnection, invoice: &str, gateway_order: &str) -> Result<model::Booking, RentalError> {
    use crate::schema::bookings::dsl::*;
    conn.transaction::<_, RentalError, _>(|conn| {
        let booking = bookings
            .filter(invoice_number.eq(invoice.trim().to_uppercase()))
            .for_update()
            .first::<model::Booking>(conn)?;
        match booking.order_id.as_deref() {
            Some(existing) if existing == gateway_order => Ok(booking),
            Some(_) => Err(RentalError::InputDataError),
            None => {
                let updated = diesel::update(bookings.find(booking.id))
                    .set((order_id.eq(Some(gateway_order)), updated_at.eq(chrono::Utc::now())))
                    .get_result::<model::Booking>(conn)
                    .map_err(link_error)?;
                Ok(updated)
            }
        }
    })
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("update-status")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: UpdateStatusData| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            if body.order_id.trim().is_empty() {
                return methods::standard_replies::validation_failed(vec![("order_id", "Order id is required")]);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("payment/update-status: no database connection"));
            };
            let booking = match attach_order(&mut pool, &body.invoice_number, body.order_id.trim()) {
                Ok(booking) => booking,
                Err(RentalError::NotFound) => return methods::standard_replies::not_found_response("Booking"),
                Err(RentalError::InputDataError) => {
                    return methods::standard_replies::bad_request("This booking is already linked to another payment order");
                }
                Err(err) => return methods::standard_replies::rental_error_response(err, "payment/update-status"),
            };
            drop(pool);
            match methods::booking::sync_with_gateway(booking, "update-status").await {
                Ok(synced) => methods::standard_replies::response_with_obj(PaymentState::from(&synced), StatusCode::OK),
                Err(err) => methods::standard_replies::rental_error_response(err, "payment/update-status"),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_held_by_another_booking_is_a_conflict() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(String::from("duplicate key value violates unique constraint \"bookings_order_id_key\"")),
        );
        assert_eq!(link_error(err), RentalError::OrderAlreadyLinked);
        assert_eq!(link_error(DieselError::NotFound), RentalError::NotFound);
    }

    #[tokio::test]
    async fn blank_order_id_is_rejected() {
        let resp = warp::test::request()
            .method("POST")
            .path("/update-status")
            .json(&serde_json::json!({ "invoice_number": "RC7K3M9P2Q", "order_id": "  " }))
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
