//! Output encoding.
//!
//! This module provides:
//! - [`encode_raster`]: JPEG, PNG, WebP and BMP via the `image` crate's codecs
//! - [`encode_ico`] / [`wrap_icon`]: the single-image icon container, built
//!   byte by byte around a PNG payload
//!
//! # Examples
//!
//! ```ignore
//! use snapforge_core::encode::{encode_raster, TargetFormat};
//!
//! let raster = Raster::filled(100, 100, [128, 128, 128, 255]);
//! let jpeg_bytes = encode_raster(&raster, TargetFormat::Jpeg, 0.92).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod format;
mod ico;
mod raster;

pub use format::{jpeg_quality, TargetFormat};
pub use ico::{encode_ico, wrap_icon, ICO_ENTRY_LEN, ICO_HEADER_LEN, ICO_PAYLOAD_OFFSET};
pub use raster::{encode_png, encode_raster, EncodeError};
