use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::pricing::round_money;
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct PricingData {
    category_id: i32,
    group_code: String,
    season_id: i32,
    price_3_6: Decimal,
    price_7_14: Decimal,
    price_15_plus: Decimal,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("upsert")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: PricingData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (_admin, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::Admin).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/pricing/upsert"),
            };
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if body.group_code.trim().is_empty() {
                invalid.push(("group_code", "Group code is required"));
            }
            for (field, price) in [
                ("price_3_6", body.price_3_6),
                ("price_7_14", body.price_7_14),
                ("price_15_plus", body.price_15_plus),
            ] {
                if price < Decimal::ZERO {
                    invalid.push((field, "Price cannot be negative"));
                }
            }
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/pricing/upsert: no database connection"));
            };
            if let Err(err) = super::find_season(&mut pool, body.season_id) {
                return methods::standard_replies::rental_error_response(err, "admin/pricing/upsert");
            }
            // a manual price is a new baseline, so earlier base prices are dropped
            let prices = model::SeasonalPricingPrices {
                price_3_6: round_money(body.price_3_6),
                price_7_14: round_money(body.price_7_14),
                price_15_plus: round_money(body.price_15_plus),
                base_price_3_6: None,
                base_price_7_14: None,
                base_price_15_plus: None,
            };
            let new_row = model::NewSeasonalPricing {
                category_id: body.category_id,
                group_code: body.group_code.trim().to_uppercase(),
                season_id: body.season_id,
                price_3_6: prices.price_3_6,
                price_7_14: prices.price_7_14,
                price_15_plus: prices.price_15_plus,
                base_price_3_6: None,
                base_price_7_14: None,
                base_price_15_plus: None,
            };
            use crate::schema::seasonal_pricings::dsl as sp_q;
            let saved = diesel::insert_into(sp_q::seasonal_pricings)
                .values(&new_row)
                .on_conflict((sp_q::category_id, sp_q::group_code, sp_q::season_id))
                .do_update()
                .set(&prices)
                .get_result::<model::SeasonalPricing>(&mut pool);
            match saved {
                Ok(row) => methods::standard_replies::response_with_obj_and_token(token, row, StatusCode::OK),
                Err(diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    methods::standard_replies::not_found_response("Vehicle category")
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/pricing/upsert: {}", err)),
            }
        })
}
