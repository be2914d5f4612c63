use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct BookingFilter {
    status: Option<model::BookingStatus>,
    payment_status: Option<model::PaymentStatus>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<BookingFilter>())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, query: BookingFilter, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/booking/get-all"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/booking/get-all: no database connection"));
            };
            use crate::schema::bookings::dsl as b_q;
            let mut booking_query = b_q::bookings.into_boxed();
            if let Some(status) = query.status {
                booking_query = booking_query.filter(b_q::status.eq(status));
            }
            if let Some(payment_status) = query.payment_status {
                booking_query = booking_query.filter(b_q::payment_status.eq(payment_status));
            }
            match booking_query
                .order(b_q::created_at.desc())
                .load::<model::Booking>(&mut pool)
            {
                Ok(bookings) => methods::standard_replies::response_with_obj_and_token(token, bookings, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/booking/get-all: {}", err)),
            }
        })
}
