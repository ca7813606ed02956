use thiserror::Error;
use time::OffsetDateTime;

/// Hard ceiling on a single uploaded file.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];
const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Only image files (JPEG, PNG, GIF, WebP) and PDF files are allowed")]
    UnsupportedType,
    #[error("File exceeds the 5 MiB size limit")]
    TooLarge,
}

/// Classify a file by its declared name, declared content type and size,
/// before anything touches disk. Size wins over type: an oversized file is
/// `TooLarge` even when it would otherwise be acceptable.
pub fn classify(
    original_name: &str,
    content_type: &str,
    size: usize,
) -> Result<FileKind, UploadError> {
    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge);
    }

    let ext = extension(original_name);
    let is_image = IMAGE_TYPES.contains(&ext.as_str())
        && IMAGE_TYPES.iter().any(|t| content_type.contains(t));
    if is_image {
        return Ok(FileKind::Image);
    }
    if ext == "pdf" && content_type == PDF_CONTENT_TYPE {
        return Ok(FileKind::Document);
    }
    Err(UploadError::UnsupportedType)
}

/// Collision-resistant stored name: upload millis, random suffix, original
/// extension preserved.
pub fn stored_filename(original_name: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::random();
    let ext = extension(original_name);
    if ext.is_empty() {
        format!("project-{millis}-{suffix}")
    } else {
        format!("project-{millis}-{suffix}.{ext}")
    }
}

fn extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
