use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone, Default)]
struct VehicleFilter {
    category_id: Option<i32>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<VehicleFilter>())
        .and_then(async move |method: Method, query: VehicleFilter| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("vehicle/get-all: no database connection"));
            };
            use crate::schema::vehicles::dsl as v_q;
            let mut vehicle_query = v_q::vehicles
                .into_boxed()
                .filter(v_q::available);
            if let Some(category) = query.category_id {
                vehicle_query = vehicle_query.filter(v_q::category_id.eq(category));
            }
            let result = vehicle_query
                .order((v_q::group_code.asc(), v_q::name.asc()))
                .load::<model::Vehicle>(&mut pool);
            match result {
                Ok(vehicles) => methods::standard_replies::response_with_obj(vehicles, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("vehicle/get-all: {}", err)),
            }
        })
}
