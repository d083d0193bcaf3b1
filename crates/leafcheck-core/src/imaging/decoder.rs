//! Upload bytes to RGB pixel tensors.

use image::imageops::FilterType;
use image::{ImageError, ImageReader, Limits, RgbImage};
use std::io::Cursor;
use tracing::debug;

use crate::error::{Error, Result};

/// Number of colour channels in every decoded tensor (R, G, B).
pub const CHANNELS: usize = 3;

/// A single decoded image in HWC layout with values in `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    height: u32,
    width: u32,
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.as_raw().iter().map(|&v| v as f32).collect();
        Self {
            height,
            width,
            data,
        }
    }

    /// Build a tensor from raw HWC values.
    pub fn from_raw(height: u32, width: u32, data: Vec<f32>) -> Result<Self> {
        let expected = height as usize * width as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::InvalidImage(format!(
                "expected {} values for a {}x{} RGB tensor, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Shape of the tensor wrapped in a batch of one: `[1, H, W, C]`.
    pub fn batch_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, CHANNELS]
    }

    /// Rows of pixels, each pixel as `[r, g, b]`.
    pub fn to_nested(&self) -> Vec<Vec<[f32; CHANNELS]>> {
        let row_len = self.width as usize * CHANNELS;
        self.data
            .chunks(row_len.max(1))
            .map(|row| {
                row.chunks_exact(CHANNELS)
                    .map(|px| [px[0], px[1], px[2]])
                    .collect()
            })
            .collect()
    }
}

/// Largest accepted width or height, in pixels, of an uploaded image.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Decodes raw upload bytes into [`ImageTensor`]s.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    target_size: Option<(u32, u32)>,
    max_dimension: u32,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::native()
    }
}

impl ImageDecoder {
    /// Decoder that keeps the native resolution.
    pub fn native() -> Self {
        Self {
            target_size: None,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Decoder that resizes every image to `width` x `height`.
    pub fn resizing(width: u32, height: u32) -> Self {
        Self {
            target_size: Some((width, height)),
            ..Self::native()
        }
    }

    /// Decoder for a backend with an optional square input resolution.
    pub fn for_input_size(input_size: Option<u32>) -> Self {
        match input_size {
            Some(size) => Self::resizing(size, size),
            None => Self::native(),
        }
    }

    /// Reject images wider or taller than `max_dimension` before decoding
    /// their pixels.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<ImageTensor> {
        if bytes.is_empty() {
            return Err(Error::InvalidImage("uploaded file is empty".to_string()));
        }

        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);

        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| Error::InvalidImage(format!("could not read image: {}", e)))?;
        reader.limits(limits);

        let decoded = reader.decode().map_err(|e| match e {
            ImageError::Limits(_) => Error::InvalidImage(format!(
                "image exceeds {0}x{0} pixels",
                self.max_dimension
            )),
            other => Error::InvalidImage(format!("could not decode image: {}", other)),
        })?;
        let mut rgb = decoded.to_rgb8();
        debug!("Decoded {}x{} image", rgb.width(), rgb.height());

        if let Some((width, height)) = self.target_size {
            if rgb.dimensions() != (width, height) {
                // Bilinear, matching the resize the model was trained with
                rgb = image::imageops::resize(&rgb, width, height, FilterType::Triangle);
            }
        }

        Ok(ImageTensor::from_rgb(&rgb))
    }
}
