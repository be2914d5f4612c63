use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct PricingQuery {
    season_id: i32,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<PricingQuery>())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, query: PricingQuery, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/pricing/get"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/pricing/get: no database connection"));
            };
            if let Err(err) = super::find_season(&mut pool, query.season_id) {
                return methods::standard_replies::rental_error_response(err, "admin/pricing/get");
            }
            use crate::schema::seasonal_pricings::dsl as sp_q;
            match sp_q::seasonal_pricings
                .filter(sp_q::season_id.eq(query.season_id))
                .order((sp_q::category_id.asc(), sp_q::group_code.asc()))
                .load::<model::SeasonalPricing>(&mut pool)
            {
                Ok(rows) => methods::standard_replies::response_with_obj_and_token(token, rows, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/pricing/get: {}", err)),
            }
        })
}
