use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods};

#[derive(Deserialize, Serialize, Clone)]
struct DeleteData {
    id: i32,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("delete")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: DeleteData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/post/delete"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/post/delete: no database connection"));
            };
            use crate::schema::posts::dsl as p_q;
            match diesel::delete(p_q::posts.find(body.id)).execute(&mut pool) {
                Ok(0) => methods::standard_replies::not_found_response("Post"),
                Ok(_) => {
                    tracing::info!("staff {} deleted post {}", staff.id, body.id);
                    methods::standard_replies::response_with_obj_and_token(
                        token,
                        serde_json::json!({ "deleted": body.id }),
                        StatusCode::OK,
                    )
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/post/delete: {}", err)),
            }
        })
}
