//! Image decoding for inference input.

mod decoder;

pub use decoder::{ImageDecoder, ImageTensor, CHANNELS, DEFAULT_MAX_DIMENSION};
