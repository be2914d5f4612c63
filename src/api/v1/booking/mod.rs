mod lookup;
mod new;
mod quote;

use warp::Filter;

pub fn api_v1_booking() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("booking")
        .and(
            quote::main()
                .or(new::main())
                .or(lookup::main())
        )
        .and(warp::path::end())
}
