mod get;

use warp::Filter;

pub fn api_v1_admin_payment_log() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("payment-log")
        .and(get::main())
        .and(warp::path::end())
}
