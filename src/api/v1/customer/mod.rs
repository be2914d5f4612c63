mod get;
mod login;
mod register;
mod update;

use warp::Filter;

pub fn api_v1_customer() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("customer")
        .and(
            login::main()
                .or(register::main())
                .or(get::main())
                .or(update::main())
        )
        .and(warp::path::end())
}
