use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde_derive::{Deserialize, Serialize};
use sha2::Sha256;
use crate::config::GatewayConfig;
use crate::helper_model::RentalError;
use crate::methods::booking_status::PaymentOutcome;

type HmacSha256 = Hmac<Sha256>;

/// Callbacks signed longer ago than this are refused.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Status strings used by the gateway, both in callbacks and in the order-status API.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl GatewayStatus {
    /// `None` while the gateway has not settled the order yet.
    pub fn outcome(&self) -> Option<PaymentOutcome> {
        match self {
            GatewayStatus::Pending => None,
            GatewayStatus::Paid => Some(PaymentOutcome::Paid),
            GatewayStatus::Failed => Some(PaymentOutcome::Failed),
            GatewayStatus::Refunded => Some(PaymentOutcome::Refunded),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CallbackPayload {
    pub event_id: String,
    /// Gateway order id, or our invoice number when the order id is not known yet.
    pub order_id: String,
    pub status: GatewayStatus,
    pub amount: Option<Decimal>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OrderStatus {
    pub order_id: String,
    pub status: GatewayStatus,
    pub amount: Option<Decimal>,
}

fn signed_mac(secret: &str, timestamp: &str, payload: &[u8]) -> Result<HmacSha256, RentalError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| RentalError::InternalServerError)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Checks an `x-signature: t=<unix>,v1=<hex>` header against the raw body.
pub fn verify_signature(
    secret: &str,
    signature_header: &str,
    payload: &[u8],
    now: DateTime<Utc>,
) -> Result<(), RentalError> {
    let mut timestamp: Option<&str> = None;
    let mut signature: Option<&str> = None;
    for part in signature_header.split(',') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("t=") {
            timestamp = Some(rest);
        } else if let Some(rest) = part.strip_prefix("v1=") {
            signature = Some(rest);
        }
    }
    let timestamp = timestamp.ok_or(RentalError::SignatureInvalid)?;
    let signature = signature.ok_or(RentalError::SignatureInvalid)?;

    let signed_at = timestamp.parse::<i64>().map_err(|_| RentalError::SignatureInvalid)?;
    if (now.timestamp() - signed_at).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(RentalError::SignatureInvalid);
    }

    let provided = hex::decode(signature).map_err(|_| RentalError::SignatureInvalid)?;
    signed_mac(secret, timestamp, payload)?
        .verify_slice(&provided).map_err(|_| RentalError::SignatureInvalid)
}

/// Builds the header value the gateway would send for `payload`.
pub fn sign(secret: &str, payload: &[u8], at: DateTime<Utc>) -> Result<String, RentalError> {
    let timestamp = at.timestamp().to_string();
    let signature = signed_mac(secret, &timestamp, payload)?.finalize().into_bytes();
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

/// Asks the gateway for the current state of `order_id`.
pub async fn fetch_order_status(gateway: &GatewayConfig, order_id: &str) -> Result<OrderStatus, RentalError> {
    let url = format!("{}/orders/{}", gateway.base_url.trim_end_matches('/'), order_id);
    tracing::debug!("polling {:?} gateway for order {}", gateway.mode, order_id);
    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .basic_auth(&gateway.merchant_id, Some(&gateway.secret))
        .send()
        .await
        .map_err(|err| RentalError::GatewayError(err.to_string()))?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(RentalError::NotFound);
    }
    if !resp.status().is_success() {
        return Err(RentalError::GatewayError(format!(
            "order status request for {} returned {}",
            order_id,
            resp.status()
        )));
    }
    resp.json::<OrderStatus>()
        .await
        .map_err(|err| RentalError::GatewayError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "whsec_test";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_signature_is_accepted() {
        let body = br#"{"event_id":"evt_1","order_id":"ORD1","status":"paid","amount":"450.00"}"#;
        let header = sign(SECRET, body, now()).unwrap();
        assert_eq!(verify_signature(SECRET, &header, body, now()), Ok(()));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let header = sign(SECRET, br#"{"status":"failed"}"#, now()).unwrap();
        assert_eq!(
            verify_signature(SECRET, &header, br#"{"status":"paid"}"#, now()),
            Err(RentalError::SignatureInvalid)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = b"{}";
        let header = sign("another", body, now()).unwrap();
        assert_eq!(
            verify_signature(SECRET, &header, body, now()),
            Err(RentalError::SignatureInvalid)
        );
    }

    #[test]
    fn stale_signature_is_rejected() {
        let body = b"{}";
        let signed_at = now() - chrono::Duration::minutes(6);
        let header = sign(SECRET, body, signed_at).unwrap();
        assert_eq!(
            verify_signature(SECRET, &header, body, now()),
            Err(RentalError::SignatureInvalid)
        );
    }

    #[test]
    fn malformed_header_is_rejected() {
        assert_eq!(
            verify_signature(SECRET, "v1=zz", b"{}", now()),
            Err(RentalError::SignatureInvalid)
        );
        assert_eq!(
            verify_signature(SECRET, "t=abc,v1=00", b"{}", now()),
            Err(RentalError::SignatureInvalid)
        );
    }

    #[test]
    fn signature_covers_raw_bytes() {
        let body: &[u8] = b"{\"a\":\"\xff\"}";
        let at = now();
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{}.", at.timestamp()).as_bytes());
        mac.update(body);
        let header = format!("t={},v1={}", at.timestamp(), hex::encode(mac.finalize().into_bytes()));
        assert_eq!(verify_signature(SECRET, &header, body, at), Ok(()));
    }

    #[test]
    fn callback_payload_parses_lowercase_status() {
        let payload: CallbackPayload = serde_json::from_str(
            r#"{"event_id":"evt_9","order_id":"ORD9","status":"refunded","amount":null}"#,
        )
        .unwrap();
        assert_eq!(payload.status.outcome(), Some(PaymentOutcome::Refunded));
        assert_eq!(GatewayStatus::Pending.outcome(), None);
    }
}
