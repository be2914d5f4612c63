mod check;
mod get_visible;

use warp::Filter;

pub fn api_v1_promotion() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("promotion")
        .and(
            get_visible::main()
                .or(check::main())
        )
        .and(warp::path::end())
}
