use crate::{methods, model};
use warp::http::StatusCode;
use warp::reply::with_status;
use warp::{Filter, Reply, http::Method};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (customer, token) = match methods::tokens::authenticate(&auth, &user_agent).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "customer/get"),
            };
            let pub_customer: model::PublishCustomer = customer.into();
            Ok::<_, warp::Rejection>((methods::tokens::wrap_json_reply_with_token(
                token,
                with_status(warp::reply::json(&pub_customer), StatusCode::OK),
            ),))
        })
}
