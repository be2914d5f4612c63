use crate::helper_model::{self, RentalError};
use crate::model;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

fn error_reply(title: &str, message: String, status_code: StatusCode) -> Result<(warp::reply::Response,), Rejection> {
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: title.to_string(),
        message,
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&msg),
        status_code,
    ).into_response(),))
}

pub fn bad_request(err_msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply("Bad Request", err_msg.to_string(), StatusCode::BAD_REQUEST)
}

/// 400 carrying per-field messages, `{ "title", "message", "fields": { name: reason } }`.
pub fn validation_failed(fields: Vec<(&str, &str)>) -> Result<(warp::reply::Response,), Rejection> {
    let field_map: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(name, reason)| (name.to_string(), serde_json::Value::String(reason.to_string())))
        .collect();
    let msg = serde_json::json!({
        "title": "Bad Request",
        "message": "Some fields are invalid.",
        "fields": field_map,
    });
    Ok((warp::reply::with_status(warp::reply::json(&msg), StatusCode::BAD_REQUEST).into_response(),))
}

pub fn internal_server_error_response(msg: String) -> Result<(warp::reply::Response,), Rejection> {
    tracing::error!("{}", msg);
    error_reply(
        "Internal Server Error",
        String::from("Please try again later. If the issue persists, contact our support team."),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

pub fn method_not_allowed_response() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Method Not Allowed",
        String::from("This endpoint does not support the requested method."),
        StatusCode::METHOD_NOT_ALLOWED,
    )
}

pub fn not_found_response(what: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply("Not Found", format!("{} not found.", what), StatusCode::NOT_FOUND)
}

pub fn credentials_invalid() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Unauthorized",
        String::from("Email or password is incorrect."),
        StatusCode::UNAUTHORIZED,
    )
}

pub fn user_not_admin() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Permission Denied",
        String::from("You do not have permission to access the back office."),
        StatusCode::FORBIDDEN,
    )
}

pub fn email_already_registered() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Account Exists",
        String::from("An account with this email already exists. Please log in."),
        StatusCode::CONFLICT,
    )
}

pub fn vehicle_unavailable() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Booking Not Allowed",
        String::from("This vehicle is not available for the requested time."),
        StatusCode::CONFLICT,
    )
}

pub fn pricing_not_configured(err: &RentalError) -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Pricing Not Configured",
        format!("We cannot price this rental: {}.", err),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}

pub fn promo_code_not_allowed_response(code: &str) -> Result<(warp::reply::Response,), Rejection> {
    let msg_txt = "Promo code ".to_owned() + code + " is not allowed. Please try another one.";
    error_reply("Promo Code Not Allowed", msg_txt, StatusCode::FORBIDDEN)
}

pub fn signature_invalid() -> Result<(warp::reply::Response,), Rejection> {
    error_reply(
        "Bad Request",
        String::from("Callback signature could not be verified."),
        StatusCode::BAD_REQUEST,
    )
}

pub fn response_with_obj<T>(obj: T, status_code: StatusCode)
    -> Result<(warp::reply::Response,), Rejection> where T: serde::Serialize {
    Ok((warp::reply::with_status(warp::reply::json(&obj), status_code).into_response(),))
}

/// JSON reply carrying the caller's refreshed token in the `token` header.
pub fn response_with_obj_and_token<T>(token_data: model::PublishAccessToken, obj: T, status_code: StatusCode)
    -> Result<(warp::reply::Response,), Rejection> where T: serde::Serialize {
    Ok((crate::methods::tokens::wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&obj), status_code),
    ),))
}

pub fn auth_customer_reply(
    customer: &model::PublishCustomer,
    token_data: &model::PublishAccessToken,
    is_created: bool,
) -> Result<(warp::reply::Response,), Rejection> {
    let reply = warp::reply::json(&customer);
    let reply = warp::reply::with_header(reply, "token", token_data.token.clone());
    let status_code = if is_created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((warp::reply::with_status(reply, status_code).into_response(),))
}

/// Maps a domain error onto its HTTP reply. `context` names the route for the log line.
pub fn rental_error_response(err: RentalError, context: &str) -> Result<(warp::reply::Response,), Rejection> {
    match err {
        RentalError::InputDataError => bad_request("Input data invalid"),
        RentalError::TokenFormatError => crate::methods::tokens::token_not_hex_warp_return(),
        RentalError::InvalidToken => crate::methods::tokens::token_invalid_return(),
        RentalError::Forbidden => user_not_admin(),
        RentalError::NotFound => not_found_response("Record"),
        RentalError::NoSeason | RentalError::NoPricing => pricing_not_configured(&err),
        RentalError::PromoCodeNotAllowed(code) => promo_code_not_allowed_response(&code),
        RentalError::VehicleUnavailable => vehicle_unavailable(),
        RentalError::InvalidTransition => error_reply(
            "Status Change Not Allowed",
            String::from("This status change is not allowed."),
            StatusCode::CONFLICT,
        ),
        RentalError::AmountMismatch => error_reply(
            "Payment Amount Mismatch",
            String::from("The paid amount does not match the booking total."),
            StatusCode::CONFLICT,
        ),
        RentalError::OrderAlreadyLinked => error_reply(
            "Payment Order In Use",
            String::from("This payment order is already linked to another booking."),
            StatusCode::CONFLICT,
        ),
        RentalError::SignatureInvalid => signature_invalid(),
        RentalError::GatewayError(msg) => {
            tracing::warn!("{}: payment gateway error: {}", context, msg);
            error_reply(
                "Payment Gateway Error",
                String::from("The payment provider could not be reached. Please try again."),
                StatusCode::BAD_GATEWAY,
            )
        }
        RentalError::DatabaseError(msg) => {
            internal_server_error_response(format!("{}: database error: {}", context, msg))
        }
        RentalError::InternalServerError => {
            internal_server_error_response(format!("{}: unexpected error", context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(reply: Result<(warp::reply::Response,), Rejection>) -> StatusCode {
        reply.expect("replies never reject").0.status()
    }

    #[test]
    fn pricing_errors_are_unprocessable() {
        assert_eq!(
            status_of(rental_error_response(RentalError::NoSeason, "test")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(rental_error_response(RentalError::NoPricing, "test")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(rental_error_response(RentalError::NotFound, "test")),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn database_errors_hide_details() {
        assert_eq!(
            status_of(rental_error_response(RentalError::DatabaseError("boom".into()), "test")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(
            status_of(rental_error_response(RentalError::Forbidden, "test")),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn payment_conflicts_map_to_409() {
        assert_eq!(
            status_of(rental_error_response(RentalError::AmountMismatch, "test")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(rental_error_response(RentalError::OrderAlreadyLinked, "test")),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_failed_is_bad_request() {
        assert_eq!(
            status_of(validation_failed(vec![("email", "Email is invalid")])),
            StatusCode::BAD_REQUEST
        );
    }
}
