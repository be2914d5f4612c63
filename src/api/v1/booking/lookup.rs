use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::RentalError;
use crate::{POOL, methods};

#[derive(Deserialize, Serialize, Clone)]
struct LookupData {
    invoice_number: String,
    email: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("lookup")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: LookupData| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("booking/lookup: no database connection"));
            };
            match methods::booking::lookup_booking(&mut pool, &body.invoice_number, &body.email) {
                Ok(detail) => methods::standard_replies::response_with_obj(detail, StatusCode::OK),
                Err(RentalError::NotFound) => methods::standard_replies::not_found_response("Booking"),
                Err(err) => methods::standard_replies::rental_error_response(err, "booking/lookup"),
            }
        })
}
