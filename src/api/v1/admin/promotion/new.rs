use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

fn validate(promo: &model::NewPromotion) -> Vec<(&'static str, &'static str)> {
    let mut invalid = Vec::new();
    let code = promo.code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        invalid.push(("code", "Code may only contain letters, digits, '-' and '_'"));
    }
    if promo.name.trim().is_empty() {
        invalid.push(("name", "Name is required"));
    }
    if promo.discount_percent <= Decimal::ZERO || promo.discount_percent > Decimal::ONE_HUNDRED {
        invalid.push(("discount_percent", "Discount must be above 0 and at most 100"));
    }
    if let (Some(from), Some(until)) = (promo.valid_from, promo.valid_until) && until < from {
        invalid.push(("valid_until", "Promotion cannot end before it starts"));
    }
    invalid
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("new")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: model::NewPromotion, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (admin, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::Admin).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/promotion/new"),
            };
            let invalid = validate(&body);
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/promotion/new: no database connection"));
            };
            use crate::schema::promotions::dsl as promo_q;
            let new_promo = model::NewPromotion {
                code: body.code.trim().to_uppercase(),
                name: body.name.trim().to_string(),
                ..body
            };
            match diesel::insert_into(promo_q::promotions)
                .values(&new_promo)
                .get_result::<model::Promotion>(&mut pool)
            {
                Ok(promo) => {
                    tracing::info!("admin {} created promotion {}", admin.id, promo.code);
                    methods::standard_replies::response_with_obj_and_token(token, promo, StatusCode::CREATED)
                }
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    methods::standard_replies::validation_failed(vec![("code", "This promo code already exists")])
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/promotion/new: {}", err)),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn promo() -> model::NewPromotion {
        model::NewPromotion {
            code: String::from("spring-25"),
            name: String::from("Spring"),
            discount_percent: Decimal::from(15),
            valid_from: NaiveDate::from_ymd_opt(2025, 3, 1),
            valid_until: NaiveDate::from_ymd_opt(2025, 5, 31),
            is_visible: true,
            is_enabled: true,
        }
    }

    #[test]
    fn well_formed_promotion_passes() {
        assert!(validate(&promo()).is_empty());
    }

    #[test]
    fn discount_must_be_within_percent_range() {
        let mut too_big = promo();
        too_big.discount_percent = Decimal::from(120);
        assert_eq!(validate(&too_big)[0].0, "discount_percent");
    }

    #[test]
    fn inverted_validity_window_is_rejected() {
        let mut inverted = promo();
        inverted.valid_until = NaiveDate::from_ymd_opt(2025, 2, 1);
        assert_eq!(validate(&inverted)[0].0, "valid_until");
    }
}
