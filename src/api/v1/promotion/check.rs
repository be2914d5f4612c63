use chrono::Utc;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct PromoData {
    code: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("check")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: PromoData| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let code = body.code.trim().to_uppercase();
            if code.is_empty() {
                return methods::standard_replies::validation_failed(vec![("code", "Promo code is required")]);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("promotion/check: no database connection"));
            };
            use crate::schema::promotions::dsl as promo_q;
            let promo_result = promo_q::promotions
                .filter(promo_q::code.eq(&code))
                .first::<model::Promotion>(&mut pool)
                .optional();
            match promo_result {
                Ok(Some(promo)) if methods::pricing::promotion_applies(&promo, Utc::now().date_naive()) => {
                    let pub_promo: model::PublishPromotion = promo.into();
                    methods::standard_replies::response_with_obj(pub_promo, StatusCode::OK)
                }
                Ok(_) => methods::standard_replies::promo_code_not_allowed_response(&code),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("promotion/check: {}", err)),
            }
        })
}
