//! PNG snapshot of a [`FrameBuffer`].

use std::path::Path;

use crate::display::FrameBuffer;
use crate::error::Result;
use crate::ted::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Write the frame as a 320x200 RGBA PNG.
pub fn save_png(frame: &FrameBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image::save_buffer_with_format(
        path,
        &frame.rgba(),
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    log::info!("screenshot written to {}", path.display());
    Ok(())
}
