use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Diesel requires us to define a custom mapping between the Rust enum
// and the database type, if we are not using string.
use crate::schema::*;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::{AsExpression, FromSqlRow};
use std::io::Write;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::BookingStatusEnum)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::PaymentStatusEnum)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::PaymentTypeEnum)]
pub enum PaymentType {
    Online,
    OnArrival,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::CustomerRoleEnum)]
pub enum CustomerRole {
    Customer,
    Staff,
    Admin,
}

//This is for postgres. For other databases the type might be different.
impl ToSql<sql_types::BookingStatusEnum, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            BookingStatus::Pending => out.write_all(b"Pending")?,
            BookingStatus::Confirmed => out.write_all(b"Confirmed")?,
            BookingStatus::Cancelled => out.write_all(b"Cancelled")?,
            BookingStatus::Completed => out.write_all(b"Completed")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::BookingStatusEnum, Pg> for BookingStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Pending" => Ok(BookingStatus::Pending),
            b"Confirmed" => Ok(BookingStatus::Confirmed),
            b"Cancelled" => Ok(BookingStatus::Cancelled),
            b"Completed" => Ok(BookingStatus::Completed),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}
// The following is the traits implementation for other Enums.
impl ToSql<sql_types::PaymentStatusEnum, Pg> for PaymentStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            PaymentStatus::Pending => out.write_all(b"Pending")?,
            PaymentStatus::Paid => out.write_all(b"Paid")?,
            PaymentStatus::Failed => out.write_all(b"Failed")?,
            PaymentStatus::Refunded => out.write_all(b"Refunded")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::PaymentStatusEnum, Pg> for PaymentStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Pending" => Ok(PaymentStatus::Pending),
            b"Paid" => Ok(PaymentStatus::Paid),
            b"Failed" => Ok(PaymentStatus::Failed),
            b"Refunded" => Ok(PaymentStatus::Refunded),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}
impl ToSql<sql_types::PaymentTypeEnum, Pg> for PaymentType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            PaymentType::Online => out.write_all(b"Online")?,
            PaymentType::OnArrival => out.write_all(b"OnArrival")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::PaymentTypeEnum, Pg> for PaymentType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Online" => Ok(PaymentType::Online),
            b"OnArrival" => Ok(PaymentType::OnArrival),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}
impl ToSql<sql_types::CustomerRoleEnum, Pg> for CustomerRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            CustomerRole::Customer => out.write_all(b"Customer")?,
            CustomerRole::Staff => out.write_all(b"Staff")?,
            CustomerRole::Admin => out.write_all(b"Admin")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::CustomerRoleEnum, Pg> for CustomerRole {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Customer" => Ok(CustomerRole::Customer),
            b"Staff" => Ok(CustomerRole::Staff),
            b"Admin" => Ok(CustomerRole::Admin),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>, // Hashed!
    pub role: CustomerRole,
    pub date_of_registration: DateTime<Utc>,
}

impl Customer {
    pub fn is_back_office(&self) -> bool {
        matches!(self.role, CustomerRole::Staff | CustomerRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == CustomerRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishCustomer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub has_password: bool,
    pub role: CustomerRole,
    pub date_of_registration: DateTime<Utc>,
}

impl From<Customer> for PublishCustomer {
    fn from(customer: Customer) -> Self {
        PublishCustomer {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            has_password: customer.password.is_some(),
            role: customer.role,
            date_of_registration: customer.date_of_registration,
        }
    }
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>, // Hash this before inserting!
}

#[derive(Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Customer))]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccessToken {
    pub id: i32,
    pub customer_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAccessToken {
    pub token: String,
    pub exp: DateTime<Utc>,
}

impl From<AccessToken> for PublishAccessToken {
    fn from(access_token: AccessToken) -> Self {
        PublishAccessToken {
            token: hex::encode(access_token.token),
            exp: access_token.exp,
        }
    }
}

#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccessToken {
    pub customer_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

/// Parsed form of the `auth` request header, `<hex token>$<customer id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub customer_id: i32,
    pub token: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub is_enabled: bool,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = vehicle_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VehicleCategory {
    pub id: i32,
    pub name: String,
    pub folder_name: String,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(VehicleCategory, foreign_key = category_id))]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub group_code: String,
    pub seats: i32,
    pub transmission: String,
    pub image_path: Option<String>,
    pub available: bool,
    pub category_id: i32,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = seasons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Season {
    pub id: i32,
    pub name: String,
    pub season_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Season {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Insertable, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[diesel(table_name = seasons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSeason {
    pub name: String,
    pub season_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Season))]
#[diesel(belongs_to(VehicleCategory, foreign_key = category_id))]
#[diesel(table_name = seasonal_pricings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SeasonalPricing {
    pub id: i32,
    pub category_id: i32,
    pub group_code: String,
    pub season_id: i32,
    pub price_3_6: Decimal,
    pub price_7_14: Decimal,
    pub price_15_plus: Decimal,
    pub base_price_3_6: Option<Decimal>,
    pub base_price_7_14: Option<Decimal>,
    pub base_price_15_plus: Option<Decimal>,
}

#[derive(Insertable, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[diesel(table_name = seasonal_pricings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSeasonalPricing {
    pub category_id: i32,
    pub group_code: String,
    pub season_id: i32,
    pub price_3_6: Decimal,
    pub price_7_14: Decimal,
    pub price_15_plus: Decimal,
    pub base_price_3_6: Option<Decimal>,
    pub base_price_7_14: Option<Decimal>,
    pub base_price_15_plus: Option<Decimal>,
}

/// Tier and base columns written back by the bulk repricing operations.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = seasonal_pricings)]
#[diesel(treat_none_as_null = true)]
pub struct SeasonalPricingPrices {
    pub price_3_6: Decimal,
    pub price_7_14: Decimal,
    pub price_15_plus: Decimal,
    pub base_price_3_6: Option<Decimal>,
    pub base_price_7_14: Option<Decimal>,
    pub base_price_15_plus: Option<Decimal>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rental_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalOption {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub is_enabled: bool,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(RentalOption))]
#[diesel(table_name = rental_option_pricings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalOptionPricing {
    pub id: i32,
    pub rental_option_id: i32,
    pub group_code: String,
    pub price_per_day: Decimal,
    pub max_price: Option<Decimal>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Promotion {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub discount_percent: Decimal,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_visible: bool,
    pub is_enabled: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPromotion {
    pub code: String,
    pub name: String,
    pub discount_percent: Decimal,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_visible: bool,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishPromotion {
    pub code: String,
    pub name: String,
    pub discount_percent: Decimal,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl From<Promotion> for PublishPromotion {
    fn from(promo: Promotion) -> Self {
        PublishPromotion {
            code: promo.code,
            name: promo.name,
            discount_percent: promo.discount_percent,
            valid_from: promo.valid_from,
            valid_until: promo.valid_until,
        }
    }
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Customer))]
#[diesel(belongs_to(Vehicle))]
#[diesel(belongs_to(Season))]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: i32,
    pub invoice_number: String,
    pub order_id: Option<String>,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub pickup_location_id: i32,
    pub drop_off_location_id: i32,
    pub pickup_time: DateTime<Utc>,
    pub drop_off_time: DateTime<Utc>,
    pub season_id: i32,
    pub daily_rate: Decimal,
    pub total_price: Decimal,
    pub promo_code: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_type: PaymentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBooking {
    pub invoice_number: String,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub pickup_location_id: i32,
    pub drop_off_location_id: i32,
    pub pickup_time: DateTime<Utc>,
    pub drop_off_time: DateTime<Utc>,
    pub season_id: i32,
    pub daily_rate: Decimal,
    pub total_price: Decimal,
    pub promo_code: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_type: PaymentType,
}

#[derive(
    Queryable, Insertable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Booking))]
#[diesel(belongs_to(RentalOption))]
#[diesel(table_name = booking_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingOption {
    pub booking_id: i32,
    pub rental_option_id: i32,
    pub price: Decimal,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Booking))]
#[diesel(table_name = payment_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentLog {
    pub id: i32,
    pub booking_id: i32,
    pub event_id: Option<String>,
    pub source: String,
    pub payment_status: PaymentStatus,
    pub amount: Option<Decimal>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = payment_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPaymentLog {
    pub booking_id: i32,
    pub event_id: Option<String>,
    pub source: String,
    pub payment_status: PaymentStatus,
    pub amount: Option<Decimal>,
    pub payload: serde_json::Value,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = site_contents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SiteContent {
    pub id: i32,
    pub key: String,
    pub locale: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = site_contents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSiteContent {
    pub key: String,
    pub locale: String,
    pub value: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub slug: String,
    pub locale: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPost {
    pub slug: String,
    pub locale: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}
