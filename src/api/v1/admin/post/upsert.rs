use chrono::Utc;
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::RentalError;
use crate::methods::i18n::Locale;
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[derive(Deserialize, Serialize, Clone)]
struct PostData {
    slug: String,
    locale: String,
    title: String,
    #[serde(default)]
    excerpt: String,
    body: String,
    cover_image: Option<String>,
    #[serde(default)]
    is_published: bool,
}

/// Inserts or replaces the post for (`slug`, `locale`). The first publication
/// date is kept across edits.
fn save_post(conn: &mut PgConnection, mut post: model::NewPost) -> Result<model::Post, RentalError> {
    use crate::schema::posts::dsl as p_q;
    conn.transaction::<_, RentalError, _>(|conn| {
        let existing = p_q::posts
            .filter(p_q::slug.eq(&post.slug))
            .filter(p_q::locale.eq(&post.locale))
            .for_update()
            .first::<model::Post>(conn)
            .optional()?;
        post.published_at = match (post.is_published, existing.as_ref().and_then(|p| p.published_at)) {
            (false, _) => None,
            (true, Some(first)) => Some(first),
            (true, None) => Some(Utc::now()),
        };
        let saved = match existing {
            Some(existing) => diesel::update(p_q::posts.find(existing.id))
                .set((&post, p_q::updated_at.eq(Utc::now())))
                .get_result::<model::Post>(conn)?,
            None => diesel::insert_into(p_q::posts)
                .values(&post)
                .get_result::<model::Post>(conn)?,
        };
        Ok(saved)
    })
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("upsert")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: PostData, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/post/upsert"),
            };
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if !SLUG_RE.is_match(&body.slug) {
                invalid.push(("slug", "Slug may only contain lowercase letters, digits and single dashes"));
            }
            if body.title.trim().is_empty() {
                invalid.push(("title", "Title is required"));
            }
            if body.body.trim().is_empty() {
                invalid.push(("body", "Body is required"));
            }
            let locale = body.locale.parse::<Locale>().ok();
            if locale.is_none() {
                invalid.push(("locale", "Locale must be en or ru"));
            }
            let Some(locale) = locale.filter(|_| invalid.is_empty()) else {
                return methods::standard_replies::validation_failed(invalid);
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/post/upsert: no database connection"));
            };
            let new_post = model::NewPost {
                slug: body.slug,
                locale: locale.code().to_string(),
                title: body.title.trim().to_string(),
                excerpt: body.excerpt.trim().to_string(),
                body: body.body,
                cover_image: body.cover_image.filter(|path| !path.trim().is_empty()),
                is_published: body.is_published,
                published_at: None,
            };
            match save_post(&mut pool, new_post) {
                Ok(post) => {
                    tracing::info!("staff {} saved post {}/{}", staff.id, post.locale, post.slug);
                    methods::standard_replies::response_with_obj_and_token(token, post, StatusCode::OK)
                }
                Err(err) => methods::standard_replies::rental_error_response(err, "admin/post/upsert"),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercase_dash_separated() {
        assert!(SLUG_RE.is_match("winter-driving-tips"));
        assert!(SLUG_RE.is_match("top10"));
        assert!(!SLUG_RE.is_match("Winter-Tips"));
        assert!(!SLUG_RE.is_match("double--dash"));
        assert!(!SLUG_RE.is_match("-leading"));
        assert!(!SLUG_RE.is_match(""));
    }
}
