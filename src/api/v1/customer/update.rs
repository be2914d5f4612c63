use crate::schema::customers;
use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::with_status;
use warp::{Filter, Reply, http::Method};

#[derive(Deserialize, Serialize, Clone)]
struct UpdateData {
    name: Option<String>,
    phone: Option<String>,
    password: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = customers)]
struct CustomerChanges {
    name: Option<String>,
    phone: Option<String>,
    password: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("update")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: UpdateData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (customer, token) = match methods::tokens::authenticate(&auth, &user_agent).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "customer/update"),
            };
            let name = body.name.map(|n| n.trim().to_string());
            let phone = body.phone.map(|p| p.trim().to_string());
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if name.as_deref() == Some("") {
                invalid.push(("name", "Name cannot be empty"));
            }
            if phone.as_deref() == Some("") {
                invalid.push(("phone", "Phone cannot be empty"));
            }
            if body.password.as_ref().is_some_and(|p| p.chars().count() < 8) {
                invalid.push(("password", "Password must be at least 8 characters"));
            }
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }
            if name.is_none() && phone.is_none() && body.password.is_none() {
                return methods::standard_replies::bad_request("Nothing to update");
            }
            let password = match body.password {
                Some(plain) => match bcrypt::hash(&plain, bcrypt::DEFAULT_COST) {
                    Ok(hashed) => Some(hashed),
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(String::from("customer/update: cannot hash password"));
                    }
                },
                None => None,
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("customer/update: no database connection"));
            };
            use crate::schema::customers::dsl as c_q;
            let updated = diesel::update(c_q::customers.find(customer.id))
                .set(&CustomerChanges { name, phone, password })
                .get_result::<model::Customer>(&mut pool);
            match updated {
                Ok(updated) => {
                    let pub_customer: model::PublishCustomer = updated.into();
                    Ok::<_, warp::Rejection>((methods::tokens::wrap_json_reply_with_token(
                        token,
                        with_status(warp::reply::json(&pub_customer), StatusCode::OK),
                    ),))
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("customer/update: {}", err)),
            }
        })
}
