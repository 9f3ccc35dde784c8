use thiserror::Error;

use crate::ffi::GlFn;
use crate::handles::Enum;

/// Why a call was refused before it reached the GL driver.
///
/// GL's own errors are never reported here; they stay queued in the driver
/// and are read back with [`GlFn::GetError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("record carries the undefined function tag")]
    Undefined,

    #[error("unknown GL function tag {0}")]
    UnknownFunction(u32),

    #[error("{0} requires an output buffer")]
    MissingOutput(GlFn),

    #[error("{func} needs {needed} bytes of buffer, got {got}")]
    BufferTooSmall { func: GlFn, needed: usize, got: usize },

    #[error("{0} received a null pointer argument")]
    NullPointer(GlFn),

    #[error("{0} received a misaligned pointer argument")]
    Misaligned(GlFn),

    #[error("shader source is not valid UTF-8")]
    InvalidSource,

    #[error("unsupported pixel format {format:#06x} with type {ty:#06x}")]
    UnsupportedPixelFormat { format: Enum, ty: Enum },

    #[error("a {width}x{height} pixel rectangle does not fit in memory")]
    ImageTooLarge { width: i32, height: i32 },

    #[error("{0} was given an element count too large to address")]
    LengthOverflow(GlFn),

    #[error("null call record")]
    NullRecord,

    #[error("GL driver unavailable: {0}")]
    DriverUnavailable(String),

    #[error("GL worker is no longer running")]
    WorkerGone,
}
