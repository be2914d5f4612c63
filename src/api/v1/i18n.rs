use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods;
use crate::methods::i18n::Locale;

#[derive(Deserialize, Serialize, Clone)]
struct TranslateQuery {
    key: Option<String>,
}

/// `GET i18n/<locale>` returns the whole translation bundle, `?key=` a single text.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("i18n")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<TranslateQuery>())
        .and_then(async move |requested: String, method: Method, query: TranslateQuery| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(locale) = requested.parse::<Locale>() else {
                return methods::standard_replies::not_found_response("Locale");
            };
            match query.key {
                Some(key) => {
                    let value = methods::i18n::translate(locale, &key);
                    methods::standard_replies::response_with_obj(
                        serde_json::json!({ "key": key, "locale": locale, "value": value }),
                        StatusCode::OK,
                    )
                }
                None => methods::standard_replies::response_with_obj(
                    methods::i18n::bundle(locale),
                    StatusCode::OK,
                ),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_locale_returns_bundle() {
        let resp = warp::test::request()
            .method("GET")
            .path("/i18n/ru")
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["nav.home"], "Главная");
    }

    #[tokio::test]
    async fn single_key_falls_back_to_english() {
        let resp = warp::test::request()
            .method("GET")
            .path("/i18n/ru?key=error.pricing_not_configured")
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["locale"], "ru");
        assert_eq!(body["value"], "This car cannot be booked for the selected dates.");
    }

    #[tokio::test]
    async fn unknown_locale_is_not_found() {
        let resp = warp::test::request()
            .method("GET")
            .path("/i18n/de")
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bundle_is_read_only() {
        let resp = warp::test::request()
            .method("POST")
            .path("/i18n/en")
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
