//! Uploaded picture handling: validation by magic bytes and collision-free
//! storage under the served uploads directory.

use std::io::Cursor;
use std::path::Path;

use chrono::Utc;
use image::ImageReader;
use rand::Rng;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Validate an uploaded picture: size limit, then format detection from the
/// file's magic bytes (the declared content type is not trusted).
/// Returns the canonical file extension for the detected format.
pub fn validate_picture(data: &[u8]) -> Result<&'static str, String> {
    if data.len() > MAX_FILE_SIZE {
        return Err("File too large. Maximum size is 5MB.".to_string());
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Only image files are allowed".to_string())?;

    Ok(format.extensions_str().first().copied().unwrap_or("img"))
}

/// Timestamp plus random suffix keeps concurrent uploads from colliding
/// without any locking.
pub fn unique_picture_name(ext: &str) -> String {
    let suffix: u32 = rand::rng().random();
    format!("recipe-{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

/// Write the picture into the uploads directory and return the relative URL
/// stored on the recipe row.
pub async fn store_picture(
    upload_dir: &Path,
    data: &[u8],
    ext: &str,
) -> std::io::Result<String> {
    let filename = unique_picture_name(ext);
    tokio::fs::write(upload_dir.join(&filename), data).await?;
    Ok(format!("/uploads/{}", filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};

    fn png_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(1, 1)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn accepts_a_png_and_reports_its_extension() {
        assert_eq!(validate_picture(&png_bytes()).unwrap(), "png");
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = validate_picture(b"definitely not an image").unwrap_err();
        assert_eq!(err, "Only image files are allowed");
    }

    #[test]
    fn rejects_oversized_files_before_decoding() {
        let data = vec![0u8; MAX_FILE_SIZE + 1];
        let err = validate_picture(&data).unwrap_err();
        assert_eq!(err, "File too large. Maximum size is 5MB.");
    }

    #[test]
    fn picture_names_are_unique_and_well_formed() {
        let a = unique_picture_name("png");
        let b = unique_picture_name("png");
        assert!(a.starts_with("recipe-"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn stores_picture_and_returns_served_path() {
        let dir = std::env::temp_dir().join("recipe-catalog-upload-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let url = store_picture(&dir, &png_bytes(), "png").await.unwrap();
        assert!(url.starts_with("/uploads/recipe-"));

        let filename = url.strip_prefix("/uploads/").unwrap();
        let on_disk = tokio::fs::read(dir.join(filename)).await.unwrap();
        assert_eq!(on_disk, png_bytes());
    }
}
