use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::{BookingDetail, RentalError};
use crate::methods::pricing::Quote;
use crate::{POOL, methods, model};

#[derive(Deserialize, Serialize, Clone)]
struct ContactData {
    name: String,
    email: String,
    phone: String,
}

#[derive(Deserialize, Serialize, Clone)]
struct NewBookingData {
    vehicle_id: i32,
    pickup_location_id: i32,
    drop_off_location_id: i32,
    pickup_time: DateTime<Utc>,
    drop_off_time: DateTime<Utc>,
    #[serde(default)]
    option_ids: Vec<i32>,
    promo_code: Option<String>,
    payment_type: model::PaymentType,
    customer: ContactData,
}

#[derive(Serialize)]
struct NewBookingReply {
    booking: BookingDetail,
    quote: Quote,
}

fn location_is_open(conn: &mut PgConnection, location_id: i32) -> Result<bool, RentalError> {
    use crate::schema::locations::dsl as l_q;
    let open = diesel::select(diesel::dsl::exists(
        l_q::locations.filter(l_q::id.eq(location_id)).filter(l_q::is_enabled)
    ))
        .get_result::<bool>(conn)?;
    Ok(open)
}

fn create_booking(conn: &mut PgConnection, body: &NewBookingData) -> Result<NewBookingReply, RentalError> {
    use crate::schema::booking_options::dsl as bo_q;
    use crate::schema::bookings::dsl as b_q;
    use crate::schema::vehicles::dsl as v_q;
    conn.transaction::<_, RentalError, _>(|conn| {
        if !location_is_open(conn, body.pickup_location_id)? || !location_is_open(conn, body.drop_off_location_id)? {
            return Err(RentalError::InputDataError);
        }
        // row lock serialises concurrent checkouts of the same vehicle
        let vehicle = v_q::vehicles
            .find(body.vehicle_id)
            .for_update()
            .get_result::<model::Vehicle>(conn)?;
        if !vehicle.available {
            return Err(RentalError::VehicleUnavailable);
        }
        let clash = diesel::select(diesel::dsl::exists(
            b_q::bookings
                .filter(b_q::vehicle_id.eq(vehicle.id))
                .filter(b_q::status.eq_any(vec![model::BookingStatus::Pending, model::BookingStatus::Confirmed]))
                .filter(b_q::pickup_time.lt(body.drop_off_time))
                .filter(b_q::drop_off_time.gt(body.pickup_time))
        ))
            .get_result::<bool>(conn)?;
        if clash {
            return Err(RentalError::VehicleUnavailable);
        }

        let (vehicle, quote) = methods::pricing::quote_for_vehicle(
            conn,
            vehicle.id,
            body.pickup_time,
            body.drop_off_time,
            &body.option_ids,
            body.promo_code.as_deref(),
        )?;
        let customer = methods::customer::find_or_create_customer(conn, model::NewCustomer {
            name: body.customer.name.trim().to_string(),
            email: body.customer.email.clone(),
            phone: body.customer.phone.trim().to_string(),
            password: None,
        })?;
        let invoice_number = methods::booking::generate_unique_invoice_number(conn)?;

        let booking = diesel::insert_into(b_q::bookings)
            .values(&model::NewBooking {
                invoice_number,
                customer_id: customer.id,
                vehicle_id: vehicle.id,
                pickup_location_id: body.pickup_location_id,
                drop_off_location_id: body.drop_off_location_id,
                pickup_time: body.pickup_time,
                drop_off_time: body.drop_off_time,
                season_id: quote.season_id,
                daily_rate: quote.daily_rate,
                total_price: quote.total,
                promo_code: quote.promo_code.clone(),
                status: model::BookingStatus::Pending,
                payment_status: model::PaymentStatus::Pending,
                payment_type: body.payment_type,
            })
            .get_result::<model::Booking>(conn)?;
        let option_rows: Vec<model::BookingOption> = quote
            .options
            .iter()
            .map(|line| model::BookingOption {
                booking_id: booking.id,
                rental_option_id: line.rental_option_id,
                price: line.price,
            })
            .collect();
        if !option_rows.is_empty() {
            diesel::insert_into(bo_q::booking_options)
                .values(&option_rows)
                .execute(conn)?;
        }
        Ok(NewBookingReply {
            booking: BookingDetail { booking, vehicle, options: option_rows },
            quote,
        })
    })
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("new")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(async move |method: Method, body: NewBookingData| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if body.customer.name.trim().is_empty() {
                invalid.push(("customer.name", "Name is required"));
            }
            if !methods::customer::is_valid_email(&body.customer.email) {
                invalid.push(("customer.email", "Email is invalid"));
            }
            if body.customer.phone.trim().is_empty() {
                invalid.push(("customer.phone", "Phone is required"));
            }
            if body.pickup_time <= Utc::now() {
                invalid.push(("pickup_time", "Pick-up must be in the future"));
            }
            if body.drop_off_time <= body.pickup_time {
                invalid.push(("drop_off_time", "Drop-off must be after pick-up"));
            }
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("booking/new: no database connection"));
            };
            match create_booking(&mut pool, &body) {
                Ok(created) => {
                    tracing::info!(
                        "booking {} created for vehicle {}, total {}",
                        created.booking.booking.invoice_number, body.vehicle_id, created.quote.total
                    );
                    methods::standard_replies::response_with_obj(created, StatusCode::CREATED)
                }
                Err(RentalError::NotFound) => methods::standard_replies::not_found_response("Vehicle"),
                Err(err) => methods::standard_replies::rental_error_response(err, "booking/new"),
            }
        })
}
