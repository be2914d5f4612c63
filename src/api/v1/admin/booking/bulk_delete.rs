use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::{IdList, RentalError};
use crate::methods::tokens::Access;
use crate::{POOL, methods};

/// Removes bookings together with their option lines and payment logs.
fn delete_bookings(conn: &mut PgConnection, ids: &[i32]) -> Result<usize, RentalError> {
    use crate::schema::booking_options::dsl as bo_q;
    use crate::schema::bookings::dsl as b_q;
    use crate::schema::payment_logs::dsl as pl_q;
    conn.transaction::<_, RentalError, _>(|conn| {
        diesel::delete(pl_q::payment_logs.filter(pl_q::booking_id.eq_any(ids))).execute(conn)?;
        diesel::delete(bo_q::booking_options.filter(bo_q::booking_id.eq_any(ids))).execute(conn)?;
        let deleted = diesel::delete(b_q::bookings.filter(b_q::id.eq_any(ids))).execute(conn)?;
        Ok(deleted)
    })
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("bulk-delete")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: IdList, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (admin, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::Admin).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/booking/bulk-delete"),
            };
            if body.ids.is_empty() {
                return methods::standard_replies::validation_failed(vec![("ids", "Select at least one booking")]);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/booking/bulk-delete: no database connection"));
            };
            match delete_bookings(&mut pool, &body.ids) {
                Ok(deleted) => {
                    tracing::warn!("admin {} deleted {} bookings", admin.id, deleted);
                    methods::standard_replies::response_with_obj_and_token(
                        token,
                        serde_json::json!({ "deleted": deleted }),
                        StatusCode::OK,
                    )
                }
                Err(err) => methods::standard_replies::rental_error_response(err, "admin/booking/bulk-delete"),
            }
        })
}
