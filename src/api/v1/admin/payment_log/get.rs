use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct LogQuery {
    booking_id: i32,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<LogQuery>())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, query: LogQuery, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/payment-log/get"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/payment-log/get: no database connection"));
            };
            use crate::schema::payment_logs::dsl as pl_q;
            match pl_q::payment_logs
                .filter(pl_q::booking_id.eq(query.booking_id))
                .order(pl_q::created_at.asc())
                .load::<model::PaymentLog>(&mut pool)
            {
                Ok(logs) => methods::standard_replies::response_with_obj_and_token(token, logs, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/payment-log/get: {}", err)),
            }
        })
}
