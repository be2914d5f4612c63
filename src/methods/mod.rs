pub mod booking;
pub mod booking_status;
pub mod customer;
pub mod diesel_fn;
pub mod i18n;
pub mod payment_gateway;
pub mod pricing;
pub mod repricing;
pub mod standard_replies;
pub mod tokens;
pub mod uploads;
