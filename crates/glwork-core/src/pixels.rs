//! Byte sizes of client-side pixel rectangles.
//!
//! Rows are padded to the default GL pack/unpack alignment of 4 bytes; the
//! last row is not padded.

use crate::error::DispatchError;
use crate::handles::Enum;

/// Row alignment GL uses unless `GL_PACK_ALIGNMENT` is changed.
pub const DEFAULT_ALIGNMENT: usize = 4;

// GLES formats that the desktop core profile bindings do not carry.
pub const ALPHA: Enum = 0x1906;
pub const LUMINANCE: Enum = 0x1909;
pub const LUMINANCE_ALPHA: Enum = 0x190A;
pub const HALF_FLOAT_OES: Enum = 0x8D61;

fn components(format: Enum) -> Option<usize> {
    let n = match format {
        ALPHA | LUMINANCE | gl::RED | gl::RED_INTEGER | gl::DEPTH_COMPONENT => 1,
        LUMINANCE_ALPHA | gl::RG | gl::RG_INTEGER | gl::DEPTH_STENCIL => 2,
        gl::RGB | gl::RGB_INTEGER => 3,
        gl::RGBA | gl::RGBA_INTEGER | gl::BGRA => 4,
        _ => return None,
    };
    Some(n)
}

/// Size in bytes of a single pixel of `format` stored as `ty`.
pub fn bytes_per_pixel(format: Enum, ty: Enum) -> Option<usize> {
    match ty {
        gl::UNSIGNED_SHORT_5_6_5 | gl::UNSIGNED_SHORT_4_4_4_4 | gl::UNSIGNED_SHORT_5_5_5_1 => {
            Some(2)
        }
        gl::UNSIGNED_INT_2_10_10_10_REV
        | gl::UNSIGNED_INT_10F_11F_11F_REV
        | gl::UNSIGNED_INT_5_9_9_9_REV
        | gl::UNSIGNED_INT_24_8 => Some(4),
        gl::BYTE | gl::UNSIGNED_BYTE => components(format),
        gl::SHORT | gl::UNSIGNED_SHORT | gl::HALF_FLOAT | HALF_FLOAT_OES => {
            components(format).map(|n| n * 2)
        }
        gl::INT | gl::UNSIGNED_INT | gl::FLOAT => components(format).map(|n| n * 4),
        _ => None,
    }
}

/// Bytes GL reads or writes for a `width` x `height` rectangle.
pub fn image_len(width: i32, height: i32, format: Enum, ty: Enum) -> Result<usize, DispatchError> {
    let bpp = bytes_per_pixel(format, ty)
        .ok_or(DispatchError::UnsupportedPixelFormat { format, ty })?;
    if width <= 0 || height <= 0 {
        return Ok(0);
    }

    let too_large = DispatchError::ImageTooLarge { width, height };
    let row = (width as usize).checked_mul(bpp).ok_or(too_large.clone())?;
    let stride = row
        .checked_next_multiple_of(DEFAULT_ALIGNMENT)
        .ok_or(too_large.clone())?;
    stride
        .checked_mul(height as usize - 1)
        .and_then(|padded| padded.checked_add(row))
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(too_large)
}
