mod get;

use warp::Filter;

pub fn api_v1_content() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("content")
        .and(get::main())
        .and(warp::path::end())
}
