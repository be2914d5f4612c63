use rust_decimal::Decimal;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::RentalError;
use crate::methods::tokens::Access;
use crate::{POOL, methods};

#[derive(Deserialize, Serialize, Clone)]
struct AdjustData {
    season_id: i32,
    /// Signed percentage, `10` raises every price by a tenth.
    percent: Decimal,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("adjust")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: AdjustData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (admin, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::Admin).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/pricing/adjust"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/pricing/adjust: no database connection"));
            };
            if let Err(err) = super::find_season(&mut pool, body.season_id) {
                return methods::standard_replies::rental_error_response(err, "admin/pricing/adjust");
            }
            match methods::repricing::adjust_season(&mut pool, body.season_id, body.percent) {
                Ok(summary) => {
                    tracing::info!(
                        "admin {} adjusted season {} by {}%: {} of {} rows changed",
                        admin.id, summary.season_id, body.percent, summary.rows_changed, summary.rows_total
                    );
                    methods::standard_replies::response_with_obj_and_token(token, summary, StatusCode::OK)
                }
                Err(RentalError::InputDataError) => methods::standard_replies::validation_failed(vec![
                    ("percent", "Percent must be between -100 and 1000"),
                ]),
                Err(err) => methods::standard_replies::rental_error_response(err, "admin/pricing/adjust"),
            }
        })
}
