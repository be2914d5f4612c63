use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::i18n::Locale;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct PostListQuery {
    locale: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<PostListQuery>())
        .and_then(async move |method: Method, query: PostListQuery| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let locale = match query.locale.as_deref() {
                Some(raw) => match raw.parse::<Locale>() {
                    Ok(locale) => locale,
                    Err(_) => return methods::standard_replies::not_found_response("Locale"),
                },
                None => Locale::default(),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("post/get-all: no database connection"));
            };
            use crate::schema::posts::dsl as p_q;
            let result = p_q::posts
                .filter(p_q::locale.eq(locale.code()))
                .filter(p_q::is_published)
                .order(p_q::published_at.desc())
                .load::<model::Post>(&mut pool);
            match result {
                Ok(posts) => methods::standard_replies::response_with_obj(posts, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("post/get-all: {}", err)),
            }
        })
}
