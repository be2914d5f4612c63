use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct QuoteRequest {
    vehicle_id: i32,
    pickup_time: DateTime<Utc>,
    drop_off_time: DateTime<Utc>,
    #[serde(default)]
    option_ids: Vec<i32>,
    promo_code: Option<String>,
}

#[derive(Serialize)]
struct QuoteReply {
    vehicle: model::Vehicle,
    quote: methods::pricing::Quote,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("quote")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: QuoteRequest| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            if body.drop_off_time <= body.pickup_time {
                return methods::standard_replies::validation_failed(vec![
                    ("drop_off_time", "Drop-off must be after pick-up"),
                ]);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("booking/quote: no database connection"));
            };
            let priced = methods::pricing::quote_for_vehicle(
                &mut pool,
                body.vehicle_id,
                body.pickup_time,
                body.drop_off_time,
                &body.option_ids,
                body.promo_code.as_deref(),
            );
            match priced {
                Ok((vehicle, quote)) => methods::standard_replies::response_with_obj(
                    QuoteReply { vehicle, quote },
                    StatusCode::OK,
                ),
                Err(err) => methods::standard_replies::rental_error_response(err, "booking/quote"),
            }
        })
}
