use diesel::prelude::*;
use warp::http::StatusCode;
use warp::{Filter, Reply, http::Method};
use crate::methods::tokens::Access;
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("new")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, body: model::NewSeason, auth: String, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (admin, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::Admin).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/season/new"),
            };
            let mut invalid: Vec<(&str, &str)> = Vec::new();
            if body.name.trim().is_empty() {
                invalid.push(("name", "Name is required"));
            }
            if body.season_type.trim().is_empty() {
                invalid.push(("season_type", "Season type is required"));
            }
            if body.end_date < body.start_date {
                invalid.push(("end_date", "Season cannot end before it starts"));
            }
            if !invalid.is_empty() {
                return methods::standard_replies::validation_failed(invalid);
            }
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/season/new: no database connection"));
            };
            use crate::schema::seasons::dsl as season_q;
            let new_season = model::NewSeason {
                name: body.name.trim().to_string(),
                season_type: body.season_type.trim().to_string(),
                ..body
            };
            match diesel::insert_into(season_q::seasons)
                .values(&new_season)
                .get_result::<model::Season>(&mut pool)
            {
                Ok(season) => {
                    tracing::info!("admin {} created season {} ({} to {})", admin.id, season.name, season.start_date, season.end_date);
                    methods::standard_replies::response_with_obj_and_token(token, season, StatusCode::CREATED)
                }
                Err(err) => methods::standard_replies::internal_server_error_response(format!("admin/season/new: {}", err)),
            }
        })
}
