use crate::POOL;
use crate::helper_model::RentalError;
use crate::methods::diesel_fn::lower;
use crate::model::{Customer, NewCustomer};
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::task;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Emails are compared trimmed and case-insensitively everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub async fn get_customer_by_id(customer_id: &i32) -> Result<Customer, RentalError> {
    let customer_id = *customer_id;
    task::spawn_blocking(move || {
        use crate::schema::customers::dsl::*;
        let mut pool = POOL.get()?;
        customers
            .filter(id.eq(&customer_id))
            .get_result::<Customer>(&mut pool)
            .map_err(RentalError::from)
    })
        .await
        .map_err(|_| RentalError::InternalServerError)?
}

pub fn find_customer_by_email(conn: &mut PgConnection, input_email: &str) -> QueryResult<Option<Customer>> {
    use crate::schema::customers::dsl::*;
    customers
        .filter(lower(email).eq(normalize_email(input_email)))
        .first::<Customer>(conn)
        .optional()
}

/// Returns the customer registered under `new_customer.email`, creating a
/// password-less one when the email is unknown (guest checkout).
pub fn find_or_create_customer(conn: &mut PgConnection, new_customer: NewCustomer) -> QueryResult<Customer> {
    if let Some(existing) = find_customer_by_email(conn, &new_customer.email)? {
        return Ok(existing);
    }
    use crate::schema::customers::dsl::*;
    diesel::insert_into(customers)
        .values(&NewCustomer {
            email: normalize_email(&new_customer.email),
            ..new_customer
        })
        .get_result::<Customer>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_normalize_to_lowercase_trimmed() {
        assert_eq!(normalize_email("  Anna.K@Example.COM "), "anna.k@example.com");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("driver@example.com"));
        assert!(!is_valid_email("driver@example"));
        assert!(!is_valid_email("no at sign"));
        assert!(!is_valid_email(""));
    }
}
