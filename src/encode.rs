//! Conversion between raw image bytes and the embeddable string value.
//!
//! The value format is a `data:` URL: `data:<mime>;base64,<payload>`. An
//! empty string means "no image". The MIME type is derived from the file
//! name only; byte content is never sniffed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Extensions accepted by the file dialog filter, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Map a file name to its image MIME type, or `None` if the extension does
/// not indicate an image.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Encode raw bytes into a `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Recover the raw bytes from a `data:` URL, e.g. to rebuild a preview from
/// an externally supplied value. Returns `None` for anything that is not a
/// well-formed base64 `data:` URL.
pub fn decode_data_url(value: &str) -> Option<Vec<u8>> {
    let rest = value.strip_prefix("data:")?;
    let (_mime, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload).ok()
}
