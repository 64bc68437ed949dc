//! # Filename Generation & Validation
//!
//! Pure helpers consulted by the upload path. Stored filenames look like
//! `20240101_a1b2c3d4.png`: the local date when the upload was handled, an
//! 8 character random hex id, and the original extension lower-cased.
//!
//! Collisions between generated names are possible in principle. The
//! storage layer refuses to overwrite an existing file, and the upload
//! handler draws a fresh name when that happens.

use std::path::Path;

use uuid::Uuid;

/// Extensions accepted for upload, matched case-insensitively.
pub const VALID_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Extract the final extension of a filename, lower-cased and including the
/// leading dot.
///
/// # Returns
/// - `Some(".png")` for `photo.PNG`
/// - `None` when the name carries no extension
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// True when `filename` carries one of the allowed image extensions.
pub fn is_valid_image(filename: &str) -> bool {
    match file_extension(filename) {
        Some(ext) => VALID_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Generate a collision-resistant name for a stored image.
///
/// A new random id is drawn on every call, so two uploads of the same
/// original file get distinct stored names.
pub fn generate_unique_filename(original_filename: &str) -> String {
    let ext = file_extension(original_filename).unwrap_or_default();
    let date_prefix = chrono::Local::now().format("%Y%m%d");
    let unique_id = Uuid::new_v4().simple().to_string();
    format!("{}_{}{}", date_prefix, &unique_id[..8], ext)
}
