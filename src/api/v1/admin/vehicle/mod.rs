mod upload_image;

use warp::Filter;

pub fn api_v1_admin_vehicle() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("vehicle")
        .and(upload_image::main())
        .and(warp::path::end())
}
