mod get;
mod get_all;

use warp::Filter;

pub fn api_v1_post() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("post")
        .and(
            get_all::main()
                .or(get::main())
        )
        .and(warp::path::end())
}
