use warp::{reply, Filter, Reply};
use warp::http::StatusCode;
use warp::reply::with_status;
use std::collections::HashMap;

/// Echoes the request headers back, for checking what a proxy forwards.
pub fn main() -> impl Filter<Extract=(impl Reply,), Error=warp::Rejection> + Clone {
    warp::path("header-check")
        .and(warp::path::end())
        .and(warp::header::headers_cloned())
        .and_then(async move |headers: warp::http::HeaderMap| {
            let header_map: HashMap<String, String> = headers
                .iter()
                .filter_map(|(key, value)| {
                    value.to_str().ok().map(|val_str| (key.to_string(), val_str.to_string()))
                })
                .collect();
            tracing::debug!("header check with {} headers", header_map.len());
            Ok::<_, warp::Rejection>((with_status(reply::json(&header_map), StatusCode::OK).into_response(),))
        })
}
