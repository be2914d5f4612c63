use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::{Filter, Reply, http::Method};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize, Serialize, Clone)]
struct RegisterData {
    name: String,
    email: String,
    phone: String,
    password: String,
    /// Invoice number of an earlier booking; proves ownership of a guest account.
    invoice_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Create,
    Claim(i32),
    Refused,
}

/// A guest account is only claimed by someone who can name one of its invoices.
fn registration_for(existing: Option<&model::Customer>, owns_guest_booking: bool) -> Registration {
    match existing {
        None => Registration::Create,
        Some(customer) if customer.password.is_none() && owns_guest_booking => Registration::Claim(customer.id),
        Some(_) => Registration::Refused,
    }
}

fn holds_invoice(conn: &mut PgConnection, guest_id: i32, invoice: &str) -> QueryResult<bool> {
    use crate::schema::bookings::dsl::*;
    diesel::select(diesel::dsl::exists(
        bookings
            .filter(customer_id.eq(guest_id))
            .filter(invoice_number.eq(invoice.trim().to_uppercase()))
    ))
        .get_result::<bool>(conn)
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("register")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: RegisterData, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if body.name.trim().is_empty() {
                invalid.push(("name", "Name is required"));
            }
            if !methods::customer::is_valid_email(&body.email) {
                invalid.push(("email", "Email is invalid"));
            }
            if body.phone.trim().is_empty() {
                invalid.push(("phone", "Phone is required"));
            }
            if body.password.chars().count() < MIN_PASSWORD_LEN {
                invalid.push(("password", "Password must be at least 8 characters"));
            }
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }

            let Ok(hashed_pass) = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST) else {
                return methods::standard_replies::internal_server_error_response(String::from("customer/register: cannot hash password"));
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("customer/register: no database connection"));
            };
            let existing = match methods::customer::find_customer_by_email(&mut pool, &body.email) {
                Ok(existing) => existing,
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("customer/register: {}", err));
                }
            };
            let owns_guest_booking = match (&existing, body.invoice_number.as_deref()) {
                (Some(guest), Some(invoice)) if guest.password.is_none() => {
                    match holds_invoice(&mut pool, guest.id, invoice) {
                        Ok(owns) => owns,
                        Err(err) => {
                            return methods::standard_replies::internal_server_error_response(format!("customer/register: {}", err));
                        }
                    }
                }
                _ => false,
            };
            use crate::schema::customers::dsl as c_q;
            let saved = match registration_for(existing.as_ref(), owns_guest_booking) {
                Registration::Refused => {
                    if existing.as_ref().is_some_and(|customer| customer.password.is_none()) {
                        tracing::warn!("customer/register: guest account claim without a matching invoice");
                        return methods::standard_replies::validation_failed(vec![
                            ("invoice_number", "Enter the invoice number of one of your bookings to claim this account"),
                        ]);
                    }
                    return methods::standard_replies::email_already_registered();
                }
                Registration::Claim(guest_id) => diesel::update(c_q::customers.find(guest_id))
                    .set((
                        c_q::name.eq(body.name.trim()),
                        c_q::phone.eq(body.phone.trim()),
                        c_q::password.eq(Some(hashed_pass)),
                    ))
                    .get_result::<model::Customer>(&mut pool),
                Registration::Create => diesel::insert_into(c_q::customers)
                    .values(&model::NewCustomer {
                        name: body.name.trim().to_string(),
                        email: methods::customer::normalize_email(&body.email),
                        phone: body.phone.trim().to_string(),
                        password: Some(hashed_pass),
                    })
                    .get_result::<model::Customer>(&mut pool),
            };
            let customer = match saved {
                Ok(customer) => customer,
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("customer/register: {}", err));
                }
            };
            let token = match methods::tokens::issue_token(&customer.id, &user_agent).await {
                Ok(token) => token,
                Err(err) => return methods::standard_replies::rental_error_response(err, "customer/register"),
            };
            tracing::info!("customer {} registered", customer.id);
            let pub_customer: model::PublishCustomer = customer.into();
            methods::standard_replies::auth_customer_reply(&pub_customer, &token, true)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn customer(password: Option<&str>) -> model::Customer {
        model::Customer {
            id: 42,
            name: String::from("Anna"),
            email: String::from("anna@example.com"),
            phone: String::from("+10000000000"),
            password: password.map(String::from),
            role: model::CustomerRole::Customer,
            date_of_registration: Utc::now(),
        }
    }

    #[test]
    fn unknown_email_creates_an_account() {
        assert_eq!(registration_for(None, false), Registration::Create);
    }

    #[test]
    fn guest_is_claimed_only_with_its_invoice() {
        let guest = customer(None);
        assert_eq!(registration_for(Some(&guest), true), Registration::Claim(42));
        assert_eq!(registration_for(Some(&guest), false), Registration::Refused);
    }

    #[test]
    fn registered_email_is_refused() {
        let member = customer(Some("$2b$12$hash"));
        assert_eq!(registration_for(Some(&member), true), Registration::Refused);
    }
}
