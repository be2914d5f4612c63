use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct OptionFilter {
    group_code: Option<String>,
}

#[derive(Serialize)]
struct RentalOptionOffer {
    #[serde(flatten)]
    option: model::RentalOption,
    pricings: Vec<model::RentalOptionPricing>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("get-all")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<OptionFilter>())
        .and_then(async move |method: Method, query: OptionFilter| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("rental-option/get-all: no database connection"));
            };
            use crate::schema::rental_option_pricings::dsl as rop_q;
            use crate::schema::rental_options::dsl as ro_q;
            let options = match ro_q::rental_options
                .filter(ro_q::is_enabled)
                .order(ro_q::name.asc())
                .load::<model::RentalOption>(&mut pool)
            {
                Ok(options) => options,
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("rental-option/get-all: {}", err));
                }
            };
            let mut pricing_query = model::RentalOptionPricing::belonging_to(&options).into_boxed();
            if let Some(group) = query.group_code.as_deref() {
                pricing_query = pricing_query.filter(rop_q::group_code.eq(group.to_string()));
            }
            let pricings = match pricing_query.load::<model::RentalOptionPricing>(&mut pool) {
                Ok(pricings) => pricings,
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("rental-option/get-all: {}", err));
                }
            };
            let offers: Vec<RentalOptionOffer> = pricings
                .grouped_by(&options)
                .into_iter()
                .zip(options)
                .map(|(pricings, option)| RentalOptionOffer { option, pricings })
                .collect();
            methods::standard_replies::response_with_obj(offers, StatusCode::OK)
        })
}
