use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("categories")
        .and(warp::path::end())
        .and(warp::method())
        .and_then(async move |method: Method| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("vehicle/categories: no database connection"));
            };
            use crate::schema::vehicle_categories::dsl as vc_q;
            match vc_q::vehicle_categories
                .order(vc_q::name.asc())
                .load::<model::VehicleCategory>(&mut pool)
            {
                Ok(categories) => methods::standard_replies::response_with_obj(categories, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("vehicle/categories: {}", err)),
            }
        })
}
