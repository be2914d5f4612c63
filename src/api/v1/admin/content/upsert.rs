use chrono::Utc;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::i18n::Locale;
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct ContentData {
    key: String,
    locale: String,
    value: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("upsert")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: ContentData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/content/upsert"),
            };
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if body.key.trim().is_empty() {
                invalid.push(("key", "Key is required"));
            }
            let locale = body.locale.parse::<Locale>().ok();
            if locale.is_none() {
                invalid.push(("locale", "Locale must be en or ru"));
            }
            let Some(locale) = locale.filter(|_| invalid.is_empty()) else {
                return methods::standard_replies::validation_failed(invalid);
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/content/upsert: no database connection"));
            };
            use crate::schema::site_contents::dsl as sc_q;
            let saved = diesel::insert_into(sc_q::site_contents)
                .values(&model::NewSiteContent {
                    key: body.key.trim().to_string(),
                    locale: locale.code().to_string(),
                    value: body.value.clone(),
                })
                .on_conflict((sc_q::key, sc_q::locale))
                .do_update()
                .set((sc_q::value.eq(&body.value), sc_q::updated_at.eq(Utc::now())))
                .get_result::<model::SiteContent>(&mut pool);
            match saved {
                Ok(content) => methods::standard_replies::response_with_obj_and_token(token, content, StatusCode::OK),
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/content/upsert: {}", err)),
            }
        })
}
