// The codec collaborator. The pipeline only ever sees width, height and a
// packed RGB byte buffer; every file-format concern (signature, row padding,
// byte order, orientation) belongs to the `image` crate behind these two
// calls. Output format is inferred from the destination extension.

use std::path::Path;

use image::{ExtendedColorType, ImageReader};

/// Loads an image from disk as a packed 3-channel RGB buffer.
pub fn load(path: &Path) -> Result<(Vec<u8>, u32, u32), image::ImageError> {
    let decoded = ImageReader::open(path)?.decode()?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width, height))
}

/// Saves a packed 3-channel RGB buffer to disk.
pub fn save(
    path: &Path,
    buffer: &[u8],
    width: u32,
    height: u32,
) -> Result<(), image::ImageError> {
    image::save_buffer(path, buffer, width, height, ExtendedColorType::Rgb8)
}
