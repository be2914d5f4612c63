mod get_all;

use warp::Filter;

pub fn api_v1_location() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("location")
        .and(get_all::main())
        .and(warp::path::end())
}
