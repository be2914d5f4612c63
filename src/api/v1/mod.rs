mod admin;
mod booking;
mod content;
mod customer;
mod i18n;
mod location;
mod payment;
mod post;
mod promotion;
mod rental_option;
mod vehicle;

use warp::Filter;

pub fn api_v1() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("v1")
        .and(
            customer::api_v1_customer()
                .or(booking::api_v1_booking())
                .or(payment::api_v1_payment())
                .or(location::api_v1_location())
                .or(vehicle::api_v1_vehicle())
                .or(rental_option::api_v1_rental_option())
                .or(promotion::api_v1_promotion())
                .or(content::api_v1_content())
                .or(post::api_v1_post())
                .or(i18n::main())
                .or(admin::api_v1_admin()),
        )
        .and(warp::path::end())
}
