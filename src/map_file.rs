//! Map ingestion: any grayscale-convertible image the `image` crate decodes
//! (PGM, PNG, ...) or an ASCII grid of `.` and `#`.
//!
//! Image rows are taken top to bottom as `y = 0, 1, ...`, so a map drawn as
//! an image appears flipped when rendered with the origin at the lower left.

use std::{fs, path::Path};

use image::DynamicImage;

use crate::{
    error::{PlanError, Result},
    occupancy::{DEFAULT_THRESHOLD, OccupancyField},
};

pub fn load<P: AsRef<Path>>(path: P) -> Result<OccupancyField> {
    let bytes = fs::read(path.as_ref())?;
    parse(&bytes)
}

/// Bytes with a recognized image signature are decoded as an image, anything
/// else must be an ASCII grid.
pub fn parse(bytes: &[u8]) -> Result<OccupancyField> {
    match image::guess_format(bytes) {
        Ok(format) => from_image(image::load_from_memory_with_format(bytes, format)?),
        Err(_) => std::str::from_utf8(bytes)
            .map_err(|e| PlanError::InvalidInput(format!("map is neither an image nor text: {e}")))?
            .parse(),
    }
}

/// Luminance of every pixel becomes the cell value.
pub fn from_image(img: DynamicImage) -> Result<OccupancyField> {
    let gray = img.into_luma8();
    let (width, height) = gray.dimensions();
    OccupancyField::new(width as u64, height as u64, gray.into_raw(), DEFAULT_THRESHOLD)
}
