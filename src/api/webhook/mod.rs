mod payment;

use warp::Filter;

pub fn webhook() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("webhook")
        .and(warp::post())
        .and(payment::main())
        .and(warp::path::end())
}
