use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/season/get-all"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/season/get-all: no database connection"));
            };
            use crate::schema::seasons::dsl as season_q;
            match season_q::seasons
                .order(season_q::start_date.desc())
                .load::<model::Season>(&mut pool)
            {
                Ok(seasons) => methods::standard_replies::response_with_obj_and_token(token, seasons, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/season/get-all: {}", err)),
            }
        })
}
