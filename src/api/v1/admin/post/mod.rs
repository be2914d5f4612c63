mod delete;
mod upsert;

use warp::Filter;

pub fn api_v1_admin_post() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("post")
        .and(
            upsert::main()
                .or(delete::main())
        )
        .and(warp::path::end())
}
