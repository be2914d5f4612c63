mod v1;
mod header_check;
mod webhook;

use warp::Filter;

pub fn api() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(v1::api_v1()
            .or(header_check::main())
        )
        .and(warp::path::end())
        .or(
            webhook::webhook()
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;

    #[tokio::test]
    async fn header_check_echoes_headers() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/header-check")
            .header("x-rentacar-client", "rentacar")
            .reply(&api())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["x-rentacar-client"], "rentacar");
    }

    #[tokio::test]
    async fn listing_routes_reject_other_methods() {
        for path in ["/api/v1/location/get-all", "/api/v1/vehicle/categories", "/api/v1/promotion/get-visible"] {
            let resp = warp::test::request()
                .method("DELETE")
                .path(path)
                .header("user-agent", "test")
                .reply(&api())
                .await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", path);
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/nothing-here")
            .reply(&api())
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
