use chrono::Utc;
use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-visible")
        .and(warp::path::end())
        .and(warp::method())
        .and_then(async move |method: Method| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("promotion/get-visible: no database connection"));
            };
            use crate::schema::promotions::dsl as promo_q;
            let result = promo_q::promotions
                .filter(promo_q::is_visible)
                .filter(promo_q::is_enabled)
                .order(promo_q::discount_percent.desc())
                .load::<model::Promotion>(&mut pool);
            match result {
                Ok(promos) => {
                    let today = Utc::now().date_naive();
                    let visible: Vec<model::PublishPromotion> = promos
                        .into_iter()
                        .filter(|promo| methods::pricing::promotion_applies(promo, today))
                        .map(model::PublishPromotion::from)
                        .collect();
                    methods::standard_replies::response_with_obj(visible, StatusCode::OK)
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("promotion/get-visible: {}", err)),
            }
        })
}
