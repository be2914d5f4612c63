use std::ops::Add;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use secrets::Secret;
use tokio::task;
use warp::http::StatusCode;
use warp::{Rejection, Reply};
use crate::POOL;
use crate::helper_model::RentalError;
use crate::model::{self, AccessToken, NewAccessToken, PublishAccessToken};
use crate::schema::access_tokens::dsl as at_q;

const APP_CLIENT_MARKER: &str = "rentacar-app";

fn token_lifetime(user_agent: &str) -> Duration {
    if user_agent.contains(APP_CLIENT_MARKER) {
        Duration::days(28)
    } else {
        Duration::seconds(600)
    }
}

fn expiration_for(user_agent: &str) -> DateTime<Utc> {
    Utc::now().add(token_lifetime(user_agent))
}

async fn generate_unique_token() -> Result<Vec<u8>, RentalError> {
    loop {
        // Generate a secure random 32-byte token
        let token_vec = Secret::<[u8; 32]>::random(|s| s.to_vec());
        let token_to_return = token_vec.clone();

        let token_exists = task::spawn_blocking(move || {
            let mut pool = POOL.get()?;
            diesel::select(diesel::dsl::exists(
                at_q::access_tokens.filter(at_q::token.eq(token_vec))
            ))
                .get_result::<bool>(&mut pool)
                .map_err(RentalError::from)
        })
            .await
            .map_err(|_| RentalError::InternalServerError)??;

        if !token_exists {
            return Ok(token_to_return);
        }
    }
}

pub async fn gen_token_object(customer_id: &i32, user_agent: &str) -> Result<NewAccessToken, RentalError> {
    Ok(NewAccessToken {
        customer_id: *customer_id,
        token: generate_unique_token().await?,
        exp: expiration_for(user_agent),
    })
}

/// Creates and stores a fresh token for `customer_id`.
pub async fn issue_token(customer_id: &i32, user_agent: &str) -> Result<PublishAccessToken, RentalError> {
    let new_token = gen_token_object(customer_id, user_agent).await?;
    let mut pool = POOL.get()?;
    let stored = diesel::insert_into(at_q::access_tokens)
        .values(&new_token)
        .get_result::<AccessToken>(&mut pool)?;
    Ok(stored.into())
}

/// Splits `<hex token>$<customer id>`.
pub fn parse_auth_header(auth: &str) -> Result<model::RequestToken, RentalError> {
    let token_and_id = auth.split('$').collect::<Vec<&str>>();
    if token_and_id.len() != 2 {
        return Err(RentalError::InvalidToken);
    }
    let customer_id = token_and_id[1].parse::<i32>().map_err(|_| RentalError::InvalidToken)?;
    Ok(model::RequestToken {
        customer_id,
        token: String::from(token_and_id[0]),
    })
}

pub async fn verify_user_token(customer_id: &i32, token_data: &str) -> Result<AccessToken, RentalError> {
    let binary_token = hex::decode(token_data).map_err(|_| RentalError::TokenFormatError)?;
    let customer_id = *customer_id;
    let token_in_db = task::spawn_blocking(move || {
        let mut pool = POOL.get()?;
        at_q::access_tokens
            .filter(at_q::customer_id.eq(customer_id))
            .filter(at_q::token.eq(binary_token))
            .first::<AccessToken>(&mut pool)
            .optional()
            .map_err(RentalError::from)
    })
        .await
        .map_err(|_| RentalError::InternalServerError)??;

    match token_in_db {
        Some(token) if token.exp >= Utc::now() => Ok(token),
        Some(expired) => {
            let _ = rm_token_by_binary(expired.token).await;
            Err(RentalError::InvalidToken)
        }
        None => Err(RentalError::InvalidToken),
    }
}

/// Pushes the expiry of a verified token forward by one lifetime.
pub fn extend_token(token: AccessToken, user_agent: &str) -> Result<AccessToken, RentalError> {
    let mut pool = POOL.get()?;
    let updated = diesel::update(at_q::access_tokens.find(token.id))
        .set(at_q::exp.eq(expiration_for(user_agent)))
        .get_result::<AccessToken>(&mut pool)?;
    Ok(updated)
}

/// Verifies the `auth` header, extends the token and loads its customer.
pub async fn authenticate(auth: &str, user_agent: &str) -> Result<(model::Customer, PublishAccessToken), RentalError> {
    let request_token = parse_auth_header(auth)?;
    let valid_token = verify_user_token(&request_token.customer_id, &request_token.token).await?;
    let extended = extend_token(valid_token, user_agent)?;
    let customer = crate::methods::customer::get_customer_by_id(&request_token.customer_id).await?;
    Ok((customer, extended.into()))
}

/// Who may call a back-office route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Staff and admins.
    BackOffice,
    Admin,
}

pub fn has_access(customer: &model::Customer, access: Access) -> bool {
    match access {
        Access::BackOffice => customer.is_back_office(),
        Access::Admin => customer.is_admin(),
    }
}

/// `authenticate` plus a role check.
pub async fn authenticate_with(
    auth: &str,
    user_agent: &str,
    access: Access,
) -> Result<(model::Customer, PublishAccessToken), RentalError> {
    let (customer, token) = authenticate(auth, user_agent).await?;
    if !has_access(&customer, access) {
        tracing::warn!("customer {} denied {:?} access", customer.id, access);
        return Err(RentalError::Forbidden);
    }
    Ok((customer, token))
}

pub async fn rm_token_by_binary(token_bit: Vec<u8>) -> Result<usize, RentalError> {
    task::spawn_blocking(move || {
        let mut pool = POOL.get()?;
        diesel::delete(at_q::access_tokens.filter(at_q::token.eq(token_bit)))
            .execute(&mut pool)
            .map_err(RentalError::from)
    })
        .await
        .map_err(|_| RentalError::InternalServerError)?
}

pub fn wrap_json_reply_with_token(
    token_data: PublishAccessToken,
    reply: impl Reply,
) -> warp::reply::Response {
    warp::reply::with_header(reply, "token", token_data.token).into_response()
}

pub fn token_not_hex_warp_return() -> Result<(warp::reply::Response,), Rejection> {
    let error_msg = serde_json::json!({"error": "Token not in hex format"});
    Ok::<_, Rejection>((warp::reply::with_status(warp::reply::json(&error_msg), StatusCode::BAD_REQUEST).into_response(),))
}

pub fn token_invalid_return() -> Result<(warp::reply::Response,), Rejection> {
    let error_msg = serde_json::json!({"error": "Token not valid"});
    Ok::<_, Rejection>((warp::reply::with_status(warp::reply::json(&error_msg), StatusCode::UNAUTHORIZED).into_response(),))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_splits_token_and_id() {
        let parsed = parse_auth_header("deadbeef$42").unwrap();
        assert_eq!(parsed.customer_id, 42);
        assert_eq!(parsed.token, "deadbeef");
    }

    #[test]
    fn auth_header_without_separator_is_invalid() {
        assert_eq!(parse_auth_header("deadbeef").unwrap_err(), RentalError::InvalidToken);
        assert_eq!(parse_auth_header("a$b$c").unwrap_err(), RentalError::InvalidToken);
    }

    #[test]
    fn auth_header_with_non_numeric_id_is_invalid() {
        assert_eq!(parse_auth_header("deadbeef$abc").unwrap_err(), RentalError::InvalidToken);
    }

    fn customer_with(role: model::CustomerRole) -> model::Customer {
        model::Customer {
            id: 1,
            name: String::from("Anna"),
            email: String::from("anna@example.com"),
            phone: String::from("+100000"),
            password: None,
            role,
            date_of_registration: Utc::now(),
        }
    }

    #[test]
    fn staff_reach_back_office_but_not_admin_routes() {
        let staff = customer_with(model::CustomerRole::Staff);
        assert!(has_access(&staff, Access::BackOffice));
        assert!(!has_access(&staff, Access::Admin));
        let customer = customer_with(model::CustomerRole::Customer);
        assert!(!has_access(&customer, Access::BackOffice));
        assert!(has_access(&customer_with(model::CustomerRole::Admin), Access::Admin));
    }

    #[test]
    fn app_clients_get_long_lived_tokens() {
        assert_eq!(token_lifetime("rentacar-app/2.1 (iOS)"), Duration::days(28));
        assert_eq!(token_lifetime("Mozilla/5.0"), Duration::seconds(600));
    }
}
