mod categories;
mod get_all;

use warp::Filter;

pub fn api_v1_vehicle() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("vehicle")
        .and(
            get_all::main()
                .or(categories::main())
        )
        .and(warp::path::end())
}
