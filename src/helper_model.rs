use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use crate::model;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RentalError {
    #[error("input data invalid")]
    InputDataError,
    #[error("token is not in hex format")]
    TokenFormatError,
    #[error("token invalid or expired")]
    InvalidToken,
    #[error("permission denied")]
    Forbidden,
    #[error("record not found")]
    NotFound,
    #[error("no season covers the rental start date")]
    NoSeason,
    #[error("no pricing configured for this vehicle group and season")]
    NoPricing,
    #[error("promo code not allowed")]
    PromoCodeNotAllowed(String),
    #[error("vehicle is not available for the requested time")]
    VehicleUnavailable,
    #[error("status transition not allowed")]
    InvalidTransition,
    #[error("paid amount does not match the booking total")]
    AmountMismatch,
    #[error("payment order already belongs to a booking")]
    OrderAlreadyLinked,
    #[error("payment callback signature invalid")]
    SignatureInvalid,
    #[error("payment gateway error: {0}")]
    GatewayError(String),
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("internal server error")]
    InternalServerError,
}

impl From<diesel::result::Error> for RentalError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => RentalError::NotFound,
            other => RentalError::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RentalError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RentalError::DatabaseError(err.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FilePath {
    pub file_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BookingDetail {
    pub booking: model::Booking,
    pub vehicle: model::Vehicle,
    pub options: Vec<model::BookingOption>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IdList {
    pub ids: Vec<i32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PaymentState {
    pub invoice_number: String,
    pub status: model::BookingStatus,
    pub payment_status: model::PaymentStatus,
}

impl From<&model::Booking> for PaymentState {
    fn from(booking: &model::Booking) -> Self {
        PaymentState {
            invoice_number: booking.invoice_number.clone(),
            status: booking.status,
            payment_status: booking.payment_status,
        }
    }
}
