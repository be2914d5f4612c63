use diesel::prelude::*;
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::{FilePath, RentalError};
use crate::methods::tokens::Access;
use crate::methods::uploads;
use crate::{POOL, methods};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("upload-image")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::multipart::form().max_length(uploads::MAX_UPLOAD_BYTES))
        .and(warp::header::<String>("auth"))
        .and(warp::header::<i32>("rental-option-id"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, form: FormData, auth: String, option_id: i32, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/rental-option/upload-image"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/rental-option/upload-image: no database connection"));
            };
            use crate::schema::rental_options::dsl as ro_q;
            match diesel::select(diesel::dsl::exists(ro_q::rental_options.filter(ro_q::id.eq(option_id))))
                .get_result::<bool>(&mut pool)
            {
                Ok(true) => {}
                Ok(false) => return methods::standard_replies::not_found_response("Rental option"),
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("admin/rental-option/upload-image: {}", err));
                }
            }
            let file = match uploads::read_single_file(form).await {
                Ok(file) => file,
                Err(_) => return methods::standard_replies::bad_request("Please upload exactly one image of at most 5 MiB"),
            };
            let file_path = match uploads::save_image(&[uploads::RENTAL_OPTION_IMAGE_DIR], &file).await {
                Ok(path) => path,
                Err(RentalError::InputDataError) => {
                    return methods::standard_replies::bad_request("Only jpg, jpeg, png and webp images are accepted");
                }
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/rental-option/upload-image"),
            };
            if let Err(err) = diesel::update(ro_q::rental_options.find(option_id))
                .set(ro_q::image_path.eq(Some(&file_path)))
                .execute(&mut pool)
            {
                return methods::standard_replies::internal_server_error_response(format!("admin/rental-option/upload-image: {}", err));
            }
            tracing::info!("staff {} uploaded {} for rental option {}", staff.id, file_path, option_id);
            methods::standard_replies::response_with_obj_and_token(token, FilePath { file_path }, StatusCode::OK)
        })
}
