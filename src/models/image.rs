//! Normalising user-supplied images to bare base64

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::errors::{EduBotError, Result};

/// Turn an image argument into a base64 payload.
///
/// Accepts a `data:` URL, a path to an existing file, or a raw base64 string.
/// Whitespace inside base64 text is removed.
pub fn process_image(image: &str) -> Result<String> {
    if image.starts_with("data:") {
        let (_, payload) = image.split_once(',').ok_or_else(|| {
            EduBotError::InvalidImage("data URL is missing the comma separator".into())
        })?;
        return Ok(strip_whitespace(payload));
    }

    let path = Path::new(image);
    if path.is_dir() {
        return Err(EduBotError::InvalidImage(format!(
            "{} is a directory, not an image file",
            path.display()
        )));
    }
    if path.is_file() {
        let bytes = std::fs::read(path)?;
        return Ok(STANDARD.encode(bytes));
    }

    let b64 = strip_whitespace(image);
    STANDARD
        .decode(&b64)
        .map_err(|e| EduBotError::InvalidImage(format!("not valid base64: {}", e)))?;
    Ok(b64)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
