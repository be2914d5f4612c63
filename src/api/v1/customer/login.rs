use crate::{POOL, methods, model};
use bcrypt::verify;
use serde_derive::{Deserialize, Serialize};
use warp::{Filter, Reply, http::Method};

#[derive(Deserialize, Serialize, Clone)]
struct LoginData {
    email: String,
    password: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("login")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, login_data: LoginData, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("customer/login: no database connection"));
            };
            let customer = match methods::customer::find_customer_by_email(&mut pool, &login_data.email) {
                Ok(Some(customer)) => customer,
                Ok(None) => return methods::standard_replies::credentials_invalid(),
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("customer/login: {}", err));
                }
            };
            // guest checkouts create customers without a password
            let Some(hashed) = customer.password.as_deref() else {
                return methods::standard_replies::credentials_invalid();
            };
            if !verify(&login_data.password, hashed).unwrap_or(false) {
                return methods::standard_replies::credentials_invalid();
            }
            let token = match methods::tokens::issue_token(&customer.id, &user_agent).await {
                Ok(token) => token,
                Err(err) => return methods::standard_replies::rental_error_response(err, "customer/login"),
            };
            tracing::info!("customer {} logged in", customer.id);
            let pub_customer: model::PublishCustomer = customer.into();
            methods::standard_replies::auth_customer_reply(&pub_customer, &token, false)
        })
}
