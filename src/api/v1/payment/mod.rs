mod update_status;
mod verify;

use warp::Filter;

pub fn api_v1_payment() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("payment")
        .and(
            update_status::main()
                .or(verify::main())
        )
        .and(warp::path::end())
}
