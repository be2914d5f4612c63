mod upload_image;

use warp::Filter;

pub fn api_v1_admin_rental_option() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("rental-option")
        .and(upload_image::main())
        .and(warp::path::end())
}
