//! Client-side guards that run before anything is sent to the backend.

use thiserror::Error;

/// Default upload ceiling: 100 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const API_KEY_PREFIX: &str = "sk-";
pub const API_KEY_MIN_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please select an image file (PNG, JPG, JPEG or WebP)")]
    NotAnImage { mime: String },

    #[error("File is too large (maximum {} MB)", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    #[error("Please enter an API key")]
    Empty,

    #[error("Invalid API key. Enter a valid OpenAI API key.")]
    InvalidFormat,
}

/// Check a picked file before uploading it.
///
/// Size is checked first so an oversized non-image reports the size problem.
pub fn check_upload(mime: &str, size: u64, limit: u64) -> Result<(), UploadRejection> {
    if size > limit {
        return Err(UploadRejection::TooLarge { size, limit });
    }
    if !mime.starts_with("image/") {
        return Err(UploadRejection::NotAnImage {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

/// Human-readable upload ceiling, in whole MB where possible.
pub fn format_limit(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} KB", (bytes / 1024).max(1))
    }
}

/// Hint shown under the upload drop zone.
pub fn upload_hint(limit: u64) -> String {
    format!("PNG, JPG, JPEG or WebP, up to {}", format_limit(limit))
}

/// Format check only; the key is never verified against the provider here.
pub fn validate_api_key(key: &str) -> Result<(), ApiKeyError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ApiKeyError::Empty);
    }
    if !key.starts_with(API_KEY_PREFIX) || key.chars().count() < API_KEY_MIN_LEN {
        return Err(ApiKeyError::InvalidFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_image_under_limit() {
        assert_eq!(check_upload("image/png", 2_000_000, MAX_UPLOAD_BYTES), Ok(()));
        assert_eq!(check_upload("image/webp", MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES), Ok(()));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = check_upload("image/jpeg", MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, UploadRejection::TooLarge { .. }));
        assert_eq!(err.to_string(), "File is too large (maximum 100 MB)");
    }

    #[test]
    fn test_rejects_non_image_with_message() {
        let err = check_upload("application/pdf", 1024, MAX_UPLOAD_BYTES).unwrap_err();
        assert_eq!(
            err,
            UploadRejection::NotAnImage {
                mime: "application/pdf".to_string()
            }
        );
        assert!(err.to_string().contains("image file"));
    }

    #[test]
    fn test_rejects_missing_mime() {
        assert!(check_upload("", 10, MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_custom_limit_message() {
        let err = check_upload("image/png", 6 * 1024 * 1024, 5 * 1024 * 1024).unwrap_err();
        assert_eq!(err.to_string(), "File is too large (maximum 5 MB)");
    }

    #[test]
    fn test_upload_hint_follows_configured_limit() {
        assert_eq!(upload_hint(MAX_UPLOAD_BYTES), "PNG, JPG, JPEG or WebP, up to 100 MB");
        assert_eq!(upload_hint(20 * 1024 * 1024), "PNG, JPG, JPEG or WebP, up to 20 MB");
        assert_eq!(format_limit(512 * 1024), "512 KB");
        assert_eq!(format_limit(10), "1 KB");
    }

    #[test]
    fn test_api_key_accepts_prefixed_long_key() {
        assert_eq!(validate_api_key("sk-abcdefghijklmnopq"), Ok(()));
        assert_eq!(validate_api_key("sk-proj-0123456789abcdef0123"), Ok(()));
    }

    #[test]
    fn test_api_key_rejects_wrong_prefix() {
        assert_eq!(
            validate_api_key("pk-abcdefghijklmnopqrstuvwxyz"),
            Err(ApiKeyError::InvalidFormat)
        );
    }

    #[test]
    fn test_api_key_rejects_short_key() {
        // 19 characters
        assert_eq!(validate_api_key("sk-abcdefghijklmnop"), Err(ApiKeyError::InvalidFormat));
        assert_eq!(validate_api_key("sk-"), Err(ApiKeyError::InvalidFormat));
    }

    #[test]
    fn test_api_key_rejects_blank() {
        assert_eq!(validate_api_key(""), Err(ApiKeyError::Empty));
        assert_eq!(validate_api_key("   "), Err(ApiKeyError::Empty));
    }
}
