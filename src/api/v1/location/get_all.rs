use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and_then(async move |method: Method| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("location/get-all: no database connection"));
            };
            use crate::schema::locations::dsl as l_q;
            let result = l_q::locations
                .filter(l_q::is_enabled)
                .order(l_q::name.asc())
                .load::<model::Location>(&mut pool);
            match result {
                Ok(locations) => methods::standard_replies::response_with_obj(locations, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("location/get-all: {}", err)),
            }
        })
}
