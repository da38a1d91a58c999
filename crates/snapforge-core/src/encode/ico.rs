//! Single-image icon container.
//!
//! ## Layout (all integers little-endian)
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 2 | reserved = 0 |
//! | 2 | 2 | type = 1 (icon) |
//! | 4 | 2 | image count = 1 |
//! | 6 | 1 | width (0 means 256 or more) |
//! | 7 | 1 | height (0 means 256 or more) |
//! | 8 | 1 | palette size = 0 |
//! | 9 | 1 | reserved = 0 |
//! | 10 | 2 | colour planes = 1 |
//! | 12 | 2 | bits per pixel = 32 |
//! | 14 | 4 | payload length |
//! | 18 | 4 | payload offset = 22 |
//! | 22 | .. | PNG payload |

use super::raster::encode_png;
use super::EncodeError;
use crate::decode::Raster;

pub const ICO_HEADER_LEN: usize = 6;
pub const ICO_ENTRY_LEN: usize = 16;
/// Offset of the payload: header plus one directory entry.
pub const ICO_PAYLOAD_OFFSET: u32 = (ICO_HEADER_LEN + ICO_ENTRY_LEN) as u32;

/// Dimensions above 255 do not fit the one-byte field and are written as 0.
#[inline]
fn dimension_byte(v: u32) -> u8 {
    if v > 255 {
        0
    } else {
        v as u8
    }
}

/// Wrap an already-encoded image payload in an icon container.
pub fn wrap_icon(payload: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(ICO_PAYLOAD_OFFSET as usize + payload.len());

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());

    out.push(dimension_byte(width));
    out.push(dimension_byte(height));
    out.push(0);
    out.push(0);
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&ICO_PAYLOAD_OFFSET.to_le_bytes());

    out.extend_from_slice(payload);
    out
}

/// Encode `raster` as PNG and wrap it as an icon.
pub fn encode_ico(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    let payload = encode_png(raster)?;
    Ok(wrap_icon(&payload, raster.width, raster.height))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
