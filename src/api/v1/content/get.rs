use std::collections::BTreeMap;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::i18n::Locale;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct ContentQuery {
    locale: String,
    key: Option<String>,
}

/// Site texts keyed by `key`. Keys missing in `locale` are filled from English.
fn load_contents(conn: &mut PgConnection, locale: Locale, key: Option<&str>) -> QueryResult<BTreeMap<String, String>> {
    use crate::schema::site_contents::dsl as sc_q;
    let mut content_query = sc_q::site_contents
        .into_boxed()
        .filter(sc_q::locale.eq_any(vec![locale.code(), Locale::En.code()]));
    if let Some(key) = key {
        content_query = content_query.filter(sc_q::key.eq(key.to_string()));
    }
    let rows = content_query.load::<model::SiteContent>(conn)?;
    let mut contents = BTreeMap::new();
    // English first so the requested locale overwrites it
    for row in rows.iter().filter(|row| row.locale == Locale::En.code()) {
        contents.insert(row.key.clone(), row.value.clone());
    }
    for row in rows.iter().filter(|row| row.locale == locale.code()) {
        contents.insert(row.key.clone(), row.value.clone());
    }
    Ok(contents)
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<ContentQuery>())
        .and_then(async move |method: Method, query: ContentQuery| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(locale) = query.locale.parse::<Locale>() else {
                return methods::standard_replies::not_found_response("Locale");
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("content/get: no database connection"));
            };
            let contents = match load_contents(&mut pool, locale, query.key.as_deref()) {
                Ok(contents) => contents,
                Err(err) => return methods::standard_replies::internal_server_error_response(format!("content/get: {}", err)),
            };
            match query.key {
                Some(key) => match contents.get(&key) {
                    Some(value) => methods::standard_replies::response_with_obj(
                        serde_json::json!({ "key": key, "locale": locale, "value": value }),
                        StatusCode::OK,
                    ),
                    None => methods::standard_replies::not_found_response("Content"),
                },
                None => methods::standard_replies::response_with_obj(contents, StatusCode::OK),
            }
        })
}
