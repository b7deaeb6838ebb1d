//! Cover image metadata

use std::path::Path;

use tracing::debug;

use super::Dimensions;

/// Pixel size of the image at `path`
///
/// Only the image header is decoded. Unreadable or unrecognised images
/// report 0x0.
pub fn cover_dimensions(path: &Path) -> Dimensions {
    match image::image_dimensions(path) {
        Ok((width, height)) => Dimensions { width, height },
        Err(e) => {
            debug!("No dimensions for {}: {}", path.display(), e);
            Dimensions::default()
        }
    }
}
