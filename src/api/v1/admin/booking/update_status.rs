use chrono::Utc;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::RentalError;
use crate::methods::booking_status::{self, AdminAction, Transition};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct StatusChange {
    booking_id: i32,
    action: AdminAction,
}

fn apply_action(conn: &mut PgConnection, change: &StatusChange) -> Result<model::Booking, RentalError> {
    use crate::schema::bookings::dsl as b_q;
    conn.transaction::<_, RentalError, _>(|conn| {
        let booking = b_q::bookings
            .find(change.booking_id)
            .for_update()
            .get_result::<model::Booking>(conn)?;
        let transition = booking_status::apply_admin_action(
            booking.status,
            booking.payment_status,
            booking.payment_type,
            change.action,
        )?;
        match transition {
            Transition::Changed { status, payment_status } => {
                let updated = diesel::update(b_q::bookings.find(booking.id))
                    .set((
                        b_q::status.eq(status),
                        b_q::payment_status.eq(payment_status),
                        b_q::updated_at.eq(Utc::now()),
                    ))
                    .get_result::<model::Booking>(conn)?;
                Ok(updated)
            }
            Transition::Unchanged => Ok(booking),
        }
    })
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("update-status")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: StatusChange, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/booking/update-status"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/booking/update-status: no database connection"));
            };
            match apply_action(&mut pool, &body) {
                Ok(booking) => {
                    tracing::info!(
                        "staff {} applied {:?} to booking {}, now {:?}",
                        staff.id, body.action, booking.invoice_number, booking.status
                    );
                    methods::standard_replies::response_with_obj_and_token(token, booking, StatusCode::OK)
                }
                Err(err) => methods::standard_replies::rental_error_response(err, "admin/booking/update-status"),
            }
        })
}
