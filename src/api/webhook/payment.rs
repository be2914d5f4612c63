use bytes::Bytes;
use chrono::Utc;
use warp::http::StatusCode;
use warp::{Filter, Reply};
use crate::config::GatewayConfig;
use crate::helper_model::{PaymentState, RentalError};
use crate::methods::booking::{CallbackResult, PaymentEvent};
use crate::methods::payment_gateway::{self, CallbackPayload};
use crate::{POOL, methods};

/// Payment gateway callback. The body is verified against `x-signature`
/// before anything is parsed, and an event id is only ever applied once.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("payment")
        .and(warp::path::end())
        .and(warp::header::<String>("x-signature"))
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::bytes())
        .and_then(async move |signature: String, body: Bytes| {
            let gateway = match GatewayConfig::from_env() {
                Ok(gateway) => gateway,
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("webhook/payment: {}", err));
                }
            };
            if payment_gateway::verify_signature(&gateway.secret, &signature, &body, Utc::now()).is_err() {
                tracing::warn!("webhook/payment: rejected callback with a bad signature");
                return methods::standard_replies::signature_invalid();
            }
            let payload: serde_json::Value = match serde_json::from_slice(&body) {
                Ok(value) => value,
                Err(_) => return methods::standard_replies::bad_request("Callback body is not JSON"),
            };
            let callback: CallbackPayload = match serde_json::from_value(payload.clone()) {
                Ok(callback) => callback,
                Err(_) => return methods::standard_replies::bad_request("Callback body is missing fields"),
            };
            let Some(outcome) = callback.status.outcome() else {
                tracing::info!("webhook/payment: order {} still pending", callback.order_id);
                return methods::standard_replies::response_with_obj(
                    serde_json::json!({ "ignored": true }),
                    StatusCode::OK,
                );
            };

            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("webhook/payment: no database connection"));
            };
            let booking = match methods::booking::find_by_order_or_invoice(&mut pool, &callback.order_id) {
                Ok(booking) => booking,
                Err(RentalError::NotFound) => return methods::standard_replies::not_found_response("Booking"),
                Err(err) => return methods::standard_replies::rental_error_response(err, "webhook/payment"),
            };
            let result = methods::booking::record_payment_event(
                &mut pool,
                booking.id,
                PaymentEvent {
                    event_id: Some(&callback.event_id),
                    source: "webhook",
                    outcome,
                    amount: callback.amount,
                    payload,
                },
            );
            match result {
                Ok(CallbackResult::Duplicate) => {
                    tracing::info!("webhook/payment: event {} already processed", callback.event_id);
                    methods::standard_replies::response_with_obj(
                        serde_json::json!({ "duplicate": true }),
                        StatusCode::OK,
                    )
                }
                Ok(CallbackResult::Applied { booking, transition }) => {
                    tracing::info!(
                        "webhook/payment: event {} applied {:?} to booking {} ({:?})",
                        callback.event_id, outcome, booking.invoice_number, transition
                    );
                    methods::standard_replies::response_with_obj(PaymentState::from(&booking), StatusCode::OK)
                }
                Err(err) => {
                    if err == RentalError::InvalidTransition {
                        tracing::warn!(
                            "webhook/payment: event {} cannot move booking {} from {:?}/{:?}",
                            callback.event_id, booking.invoice_number, booking.status, booking.payment_status
                        );
                    }
                    methods::standard_replies::rental_error_response(err, "webhook/payment")
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_unit_test";

    fn configure_gateway() {
        // SAFETY: only these tests touch the gateway variables.
        unsafe {
            std::env::set_var("PAYMENT_GATEWAY_TEST_MERCHANT_ID", "merchant");
            std::env::set_var("PAYMENT_GATEWAY_TEST_SECRET", SECRET);
            std::env::set_var("PAYMENT_GATEWAY_TEST_BASE_URL", "http://127.0.0.1:9");
        }
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        configure_gateway();
        let body = r#"{"event_id":"evt_1","order_id":"RC00000001","status":"paid","amount":"10.00"}"#;
        let resp = warp::test::request()
            .method("POST")
            .path("/payment")
            .header("x-signature", format!("t={},v1=00ff", Utc::now().timestamp()))
            .body(body)
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pending_status_is_acknowledged_without_changes() {
        configure_gateway();
        let body = r#"{"event_id":"evt_2","order_id":"RC00000002","status":"pending","amount":null}"#;
        let signature = payment_gateway::sign(SECRET, body.as_bytes(), Utc::now()).unwrap();
        let resp = warp::test::request()
            .method("POST")
            .path("/payment")
            .header("x-signature", signature)
            .body(body)
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let reply: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(reply["ignored"], true);
    }

    #[tokio::test]
    async fn signed_garbage_is_bad_request() {
        configure_gateway();
        let body = "not json";
        let signature = payment_gateway::sign(SECRET, body.as_bytes(), Utc::now()).unwrap();
        let resp = warp::test::request()
            .method("POST")
            .path("/payment")
            .header("x-signature", signature)
            .body(body)
            .reply(&main())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
