use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::i18n::Locale;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct PostQuery {
    slug: String,
    locale: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<PostQuery>())
        .and_then(async move |method: Method, query: PostQuery| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let locale = query
                .locale
                .as_deref()
                .and_then(|raw| raw.parse::<Locale>().ok())
                .unwrap_or_default();
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("post/get: no database connection"));
            };
            use crate::schema::posts::dsl as p_q;
            // a post not translated yet is served in English
            let result = p_q::posts
                .filter(p_q::slug.eq(&query.slug))
                .filter(p_q::locale.eq_any(vec![locale.code(), Locale::En.code()]))
                .filter(p_q::is_published)
                .load::<model::Post>(&mut pool);
            match result {
                Ok(mut posts) => {
                    posts.sort_by_key(|post| post.locale != locale.code());
                    match posts.into_iter().next() {
                        Some(post) => methods::standard_replies::response_with_obj(post, StatusCode::OK),
                        None => methods::standard_replies::not_found_response("Post"),
                    }
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("post/get: {}", err)),
            }
        })
}
