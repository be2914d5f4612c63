mod get_all;
mod new;

use warp::Filter;

pub fn api_v1_admin_season() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("season")
        .and(
            new::main()
                .or(get_all::main())
        )
        .and(warp::path::end())
}
