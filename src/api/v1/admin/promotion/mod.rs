mod new;

use warp::Filter;

pub fn api_v1_admin_promotion() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("promotion")
        .and(new::main())
        .and(warp::path::end())
}
