use bytes::BufMut;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use warp::multipart::FormData;
use crate::config;
use crate::helper_model::RentalError;

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub const VEHICLE_IMAGE_DIR: &str = "vehicles";
pub const RENTAL_OPTION_IMAGE_DIR: &str = "rental-options";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Drains a multipart form that must carry exactly one file.
pub async fn read_single_file(form: FormData) -> Result<UploadedFile, RentalError> {
    let mut parts: Vec<UploadedFile> = form
        .and_then(|mut field| async move {
            let file_name = field.filename().map(String::from);
            let mut bytes: Vec<u8> = Vec::new();
            while let Some(content) = field.data().await {
                bytes.put(content?);
            }
            Ok(UploadedFile { file_name, bytes })
        })
        .try_collect()
        .await
        .map_err(|_| RentalError::InputDataError)?;
    if parts.len() != 1 {
        return Err(RentalError::InputDataError);
    }
    let file = parts.remove(0);
    if file.bytes.is_empty() || file.bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(RentalError::InputDataError);
    }
    Ok(file)
}

/// Lowercased extension of `file_name` when it is an accepted image type.
pub fn image_extension(file_name: &str) -> Result<String, RentalError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or(RentalError::InputDataError)?;
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(RentalError::InputDataError)
    }
}

pub fn stored_file_name(ext: &str, at: DateTime<Utc>, id: Uuid) -> String {
    format!("{}-{}.{}", at.timestamp_millis(), id, ext)
}

/// A category folder name usable as one path segment.
pub fn safe_folder(folder: &str) -> Result<&str, RentalError> {
    let folder = folder.trim();
    let valid = !folder.is_empty()
        && folder != "."
        && folder != ".."
        && folder.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid { Ok(folder) } else { Err(RentalError::InputDataError) }
}

/// Writes `file` below `<UPLOAD_ROOT>/<relative_dir>` and returns its path relative
/// to the upload root, with `/` separators.
pub async fn save_image(relative_dir: &[&str], file: &UploadedFile) -> Result<String, RentalError> {
    let original_name = file.file_name.as_deref().ok_or(RentalError::InputDataError)?;
    let ext = image_extension(original_name)?;
    let name = stored_file_name(&ext, Utc::now(), Uuid::new_v4());

    let mut dir: PathBuf = config::upload_root();
    for segment in relative_dir {
        dir.push(segment);
    }
    tokio::fs::create_dir_all(&dir).await.map_err(|err| {
        tracing::error!("cannot create upload directory {}: {}", dir.display(), err);
        RentalError::InternalServerError
    })?;
    let target = dir.join(&name);
    tokio::fs::write(&target, &file.bytes).await.map_err(|err| {
        tracing::error!("cannot write upload {}: {}", target.display(), err);
        RentalError::InternalServerError
    })?;
    tracing::info!("stored upload {} ({} bytes)", target.display(), file.bytes.len());

    let mut relative: Vec<&str> = relative_dir.to_vec();
    relative.push(&name);
    Ok(relative.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_image_extensions_case_insensitively() {
        assert_eq!(image_extension("car.JPG").unwrap(), "jpg");
        assert_eq!(image_extension("seat.webp").unwrap(), "webp");
        assert_eq!(image_extension("photo.final.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn rejects_other_files() {
        assert!(image_extension("invoice.pdf").is_err());
        assert!(image_extension("noextension").is_err());
        assert!(image_extension("script.png.exe").is_err());
    }

    #[test]
    fn stored_names_carry_timestamp_and_uuid() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            stored_file_name("png", at, id),
            format!("{}-00000000-0000-0000-0000-000000000000.png", at.timestamp_millis())
        );
    }

    #[test]
    fn stored_names_do_not_collide() {
        let at = Utc::now();
        assert_ne!(
            stored_file_name("jpg", at, Uuid::new_v4()),
            stored_file_name("jpg", at, Uuid::new_v4())
        );
    }

    #[test]
    fn folder_names_cannot_escape_upload_root() {
        assert_eq!(safe_folder("economy"), Ok("economy"));
        assert!(safe_folder("..").is_err());
        assert!(safe_folder("a/b").is_err());
        assert!(safe_folder("").is_err());
    }

    #[tokio::test]
    async fn multipart_with_one_file_is_read() {
        let boundary = "--abcdef1234--";
        let body = format!(
            "--{0}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"car.png\"\r\ncontent-type: image/png\r\n\r\nPNGDATA\r\n--{0}--\r\n",
            boundary
        );
        let form = warp::test::request()
            .method("POST")
            .header("content-length", body.len())
            .header("content-type", format!("multipart/form-data; boundary={}", boundary))
            .body(body)
            .filter(&warp::multipart::form())
            .await
            .unwrap();
        let file = read_single_file(form).await.unwrap();
        assert_eq!(file.file_name.as_deref(), Some("car.png"));
        assert_eq!(file.bytes, b"PNGDATA".to_vec());
    }
}
