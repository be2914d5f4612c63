mod get_all;

use warp::Filter;

pub fn api_v1_rental_option() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("rental-option")
        .and(get_all::main())
        .and(warp::path::end())
}
