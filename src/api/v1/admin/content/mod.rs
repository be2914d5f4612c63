mod upsert;

use warp::Filter;

pub fn api_v1_admin_content() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("content")
        .and(upsert::main())
        .and(warp::path::end())
}
