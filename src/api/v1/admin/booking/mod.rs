mod bulk_delete;
mod get_all;
mod update_status;

use warp::Filter;

pub fn api_v1_admin_booking() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("booking")
        .and(
            get_all::main()
                .or(update_status::main())
                .or(bulk_delete::main())
        )
        .and(warp::path::end())
}
