use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::PaymentState;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct VerifyData {
    invoice_number: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("verify")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: VerifyData| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("payment/verify: no database connection"));
            };
            use crate::schema::bookings::dsl as b_q;
            let booking = match b_q::bookings
                .filter(b_q::invoice_number.eq(body.invoice_number.trim().to_uppercase()))
                .first::<model::Booking>(&mut pool)
                .optional()
            {
                Ok(Some(booking)) => booking,
                Ok(None) => return methods::standard_replies::not_found_response("Booking"),
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("payment/verify: {}", err));
                }
            };
            drop(pool);
            if booking.order_id.is_none() {
                // nothing was sent to the gateway yet
                return methods::standard_replies::response_with_obj(PaymentState::from(&booking), StatusCode::OK);
            }
            match methods::booking::sync_with_gateway(booking, "verify").await {
                Ok(synced) => methods::standard_replies::response_with_obj(PaymentState::from(&synced), StatusCode::OK),
                Err(err) => methods::standard_replies::rental_error_response(err, "payment/verify"),
            }
        })
}
