//! Image decoding for Snapforge.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP and BMP sources into RGBA rasters
//! - Applying EXIF orientation
//! - Resampling rasters
//!
//! # Architecture
//!
//! Decoding is the first suspension point of a pipeline invocation: the host
//! awaits the file bytes, then everything from here on is synchronous.
//!
//! # Examples
//!
//! ```ignore
//! use snapforge_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let raster = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod load;
mod resize;
mod types;

pub use load::decode_image;
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, FilterType, Orientation, Raster};
