mod booking;
mod content;
mod payment_log;
mod post;
mod pricing;
mod promotion;
mod rental_option;
mod season;
mod vehicle;

use warp::Filter;

/// Back-office routes. Every handler checks the caller's role itself.
pub fn api_v1_admin() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("admin")
        .and(
            booking::api_v1_admin_booking()
                .or(pricing::api_v1_admin_pricing())
                .or(season::api_v1_admin_season())
                .or(vehicle::api_v1_admin_vehicle())
                .or(rental_option::api_v1_admin_rental_option())
                .or(payment_log::api_v1_admin_payment_log())
                .or(promotion::api_v1_admin_promotion())
                .or(content::api_v1_admin_content())
                .or(post::api_v1_admin_post())
        )
        .and(warp::path::end())
}
