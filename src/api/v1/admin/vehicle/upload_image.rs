use diesel::prelude::*;
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::{Filter, Reply, http::Method};
use crate::helper_model::{FilePath, RentalError};
use crate::methods::tokens::Access;
use crate::methods::uploads;
use crate::{POOL, methods, model};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("upload-image")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::multipart::form().max_length(uploads::MAX_UPLOAD_BYTES))
        .and(warp::header::<String>("auth"))
        .and(warp::header::<i32>("vehicle-id"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, form: FormData, auth: String, vehicle_id: i32, user_agent: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let (staff, token) = match methods::tokens::authenticate_with(&auth, &user_agent, Access::BackOffice).await {
                Ok(pair) => pair,
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/vehicle/upload-image"),
            };
            let Ok(mut pool) = POOL.get() else {
                return methods::standard_replies::internal_server_error_response(String::from("admin/vehicle/upload-image: no database connection"));
            };
            use crate::schema::vehicle_categories::dsl as vc_q;
            use crate::schema::vehicles::dsl as v_q;
            let found = v_q::vehicles
                .inner_join(vc_q::vehicle_categories)
                .filter(v_q::id.eq(vehicle_id))
                .first::<(model::Vehicle, model::VehicleCategory)>(&mut pool)
                .optional();
            let category = match found {
                Ok(Some((_vehicle, category))) => category,
                Ok(None) => return methods::standard_replies::not_found_response("Vehicle"),
                Err(err) => {
                    return methods::standard_replies::internal_server_error_response(format!("admin/vehicle/upload-image: {}", err));
                }
            };
            let Ok(folder) = uploads::safe_folder(&category.folder_name) else {
                return methods::standard_replies::internal_server_error_response(format!(
                    "admin/vehicle/upload-image: category {} has an unusable folder name", category.id
                ));
            };
            let file = match uploads::read_single_file(form).await {
                Ok(file) => file,
                Err(_) => return methods::standard_replies::bad_request("Please upload exactly one image of at most 5 MiB"),
            };
            let file_path = match uploads::save_image(&[uploads::VEHICLE_IMAGE_DIR, folder], &file).await {
                Ok(path) => path,
                Err(RentalError::InputDataError) => {
                    return methods::standard_replies::bad_request("Only jpg, jpeg, png and webp images are accepted");
                }
                Err(err) => return methods::standard_replies::rental_error_response(err, "admin/vehicle/upload-image"),
            };
            if let Err(err) = diesel::update(v_q::vehicles.find(vehicle_id))
                .set(v_q::image_path.eq(Some(&file_path)))
                .execute(&mut pool)
            {
                return methods::standard_replies::internal_server_error_response(format!("admin/vehicle/upload-image: {}", err));
            }
            tracing::info!("staff {} uploaded {} for vehicle {}", staff.id, file_path, vehicle_id);
            methods::standard_replies::response_with_obj_and_token(token, FilePath { file_path }, StatusCode::OK)
        })
}
