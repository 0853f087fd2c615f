//! Image processing functionality for DOCX output

use base64::Engine;
use docx_rs::{Pic, Run};
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::model::{ImageOptions, ImageTransformation};
use crate::{Error, Result};

/// EMUs per CSS pixel at 96 DPI.
const EMU_PER_PIXEL: f64 = 9525.0;
/// Printable width of an A4 page with one-inch margins, in EMUs.
const MAX_WIDTH_EMU: f64 = 5_486_400.0;

/// Image processor for DOCX documents
#[derive(Debug, Default)]
pub struct DocxImageProcessor;

impl DocxImageProcessor {
    /// Create a new image processor
    pub fn new() -> Self {
        Self
    }

    /// Decodes base64 image data, accepting data URLs.
    pub fn decode_data(&self, data: &str) -> Result<Vec<u8>> {
        let payload = match data.find("base64,") {
            Some(start) => &data[start + "base64,".len()..],
            None => data,
        };
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        if payload.is_empty() {
            return Err(Error::packager("Image data is empty"));
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::packager(format!("Invalid base64 image data: {e}")))
    }

    /// Appends the image described by `options` to `run`.
    ///
    /// PNG and JPEG data is embedded as is; other decodable formats are
    /// re-encoded as PNG.
    pub fn process_inline_image(&self, run: Run, options: &ImageOptions) -> Result<Run> {
        let data = self.decode_data(&options.data)?;
        let format = image::guess_format(&data)
            .map_err(|e| Error::packager(format!("Unknown image format: {e}")))?;
        let img = image::load_from_memory(&data)
            .map_err(|e| Error::packager(format!("Unable to load image: {e}")))?;
        let (width, height) =
            self.calculate_image_dimensions(img.dimensions(), options.transformation.as_ref());

        let pic = match format {
            ImageFormat::Png | ImageFormat::Jpeg => Pic::new(&data),
            _ => {
                let mut buffer = Vec::new();
                img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|e| Error::packager(format!("Unable to convert image to PNG: {e}")))?;
                Pic::new(&buffer)
            }
        };
        Ok(run.add_image(pic.size(width, height)))
    }

    /// Calculate image dimensions for DOCX, in EMUs
    ///
    /// The requested pixel size wins over the natural size; images wider than
    /// the printable width are scaled down keeping their aspect ratio.
    pub fn calculate_image_dimensions(
        &self,
        natural: (u32, u32),
        transformation: Option<&ImageTransformation>,
    ) -> (u32, u32) {
        let (width_px, height_px) = match transformation {
            Some(t) if t.width > 0.0 && t.height > 0.0 => (t.width, t.height),
            _ => (natural.0 as f64, natural.1 as f64),
        };

        let mut width = width_px * EMU_PER_PIXEL;
        let mut height = height_px * EMU_PER_PIXEL;
        if width > MAX_WIDTH_EMU {
            height *= MAX_WIDTH_EMU / width;
            width = MAX_WIDTH_EMU;
        }
        (width.round() as u32, height.round() as u32)
    }
}
