//! The C-repr call record and the GL function table.
//!
//! The table in this file is the only place the function numbering is
//! written down. The Rust enum, the per-function [`Schema`] and the C header
//! produced by [`crate::header::render_c_header`] are all derived from it, so
//! the host and native sides cannot drift apart.

use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

use crate::error::DispatchError;

// =====================================================================
// Result codes
// =====================================================================

/// Returned by the C entry points when a call is rejected.
pub const FN_FAIL: usize = usize::MAX;
/// `processFnChecked` status: the call ran and `*ret` holds its result word.
pub const FN_SUCCESS: i32 = 0;
/// `processFnChecked` status: the call was refused and `*ret` is untouched.
pub const FN_REJECTED: i32 = -1;

/// Number of word-sized argument slots in a [`FnArgs`] record.
pub const ARG_SLOTS: usize = 10;

// =====================================================================
// Schema
// =====================================================================

/// What the word returned from a dispatch means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// The GL function returns nothing; the word is `0`.
    Void,
    /// The GL function's own return value (ids, locations, enums).
    Value,
    /// Number of bytes written through the output buffer.
    ByteCount,
}

/// How a function uses memory addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUse {
    None,
    /// `parg` points at input data read by GL.
    Input,
    /// `parg` points at a caller buffer GL writes into.
    Output,
    /// An argument slot carries an address.
    Slot,
}

/// Static description of one GL function in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Native GL symbol the call ends up in.
    pub symbol: &'static str,
    /// Number of populated argument slots.
    pub arity: usize,
    pub result: ResultKind,
    pub pointer: PointerUse,
}

impl Schema {
    /// A call blocks its issuer when it yields a value or references memory.
    pub fn is_blocking(&self) -> bool {
        self.result != ResultKind::Void || self.pointer != PointerUse::None
    }
}

const UNDEFINED_SCHEMA: Schema = Schema {
    symbol: "<undefined>",
    arity: 0,
    result: ResultKind::Void,
    pointer: PointerUse::None,
};

macro_rules! gl_functions {
    ($($tag:literal => $name:ident, $symbol:literal, $arity:literal, $result:ident, $pointer:ident;)*) => {
        /// Identifies one supported GL entry point.
        ///
        /// `Undefined` is the zero value and marks an uninitialized or corrupt
        /// record; it is never dispatched.
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
        pub enum GlFn {
            Undefined = 0,
            $($name = $tag,)*
        }

        impl GlFn {
            /// Every dispatchable function, in tag order.
            pub const ALL: &'static [GlFn] = &[$(GlFn::$name,)*];

            pub fn schema(self) -> &'static Schema {
                match self {
                    GlFn::Undefined => &UNDEFINED_SCHEMA,
                    $(GlFn::$name => &Schema {
                        symbol: $symbol,
                        arity: $arity,
                        result: ResultKind::$result,
                        pointer: PointerUse::$pointer,
                    },)*
                }
            }
        }
    };
}

gl_functions! {
    1  => ActiveTexture,           "glActiveTexture",           1, Void,      None;
    2  => AttachShader,            "glAttachShader",            2, Void,      None;
    3  => BindBuffer,              "glBindBuffer",              2, Void,      None;
    4  => BindTexture,             "glBindTexture",             2, Void,      None;
    5  => BindVertexArray,         "glBindVertexArray",         1, Void,      None;
    6  => BlendColor,              "glBlendColor",              4, Void,      None;
    7  => BlendFunc,               "glBlendFunc",               2, Void,      None;
    8  => BufferData,              "glBufferData",              3, Void,      Input;
    9  => Clear,                   "glClear",                   1, Void,      None;
    10 => ClearColor,              "glClearColor",              4, Void,      None;
    11 => CompileShader,           "glCompileShader",           1, Void,      None;
    12 => CreateProgram,           "glCreateProgram",           0, Value,     None;
    13 => CreateShader,            "glCreateShader",            1, Value,     None;
    14 => DeleteBuffer,            "glDeleteBuffers",           1, Void,      None;
    15 => DeleteTexture,           "glDeleteTextures",          1, Void,      None;
    16 => Disable,                 "glDisable",                 1, Void,      None;
    17 => DrawArrays,              "glDrawArrays",              3, Void,      None;
    18 => Enable,                  "glEnable",                  1, Void,      None;
    19 => EnableVertexAttribArray, "glEnableVertexAttribArray", 1, Void,      None;
    20 => Flush,                   "glFlush",                   0, Void,      None;
    21 => GenBuffer,               "glGenBuffers",              0, Value,     None;
    22 => GenTexture,              "glGenTextures",             0, Value,     None;
    23 => GenVertexArray,          "glGenVertexArrays",         0, Value,     None;
    24 => GetAttribLocation,       "glGetAttribLocation",       2, Value,     Slot;
    25 => GetError,                "glGetError",                0, Value,     None;
    26 => GetShaderInfoLog,        "glGetShaderInfoLog",        2, ByteCount, Output;
    27 => GetShaderSource,         "glGetShaderSource",         2, ByteCount, Output;
    28 => GetShaderiv,             "glGetShaderiv",             2, Value,     None;
    29 => GetTexParameteriv,       "glGetTexParameteriv",       2, ByteCount, Output;
    30 => GetUniformLocation,      "glGetUniformLocation",      2, Value,     Slot;
    31 => LinkProgram,             "glLinkProgram",             1, Void,      None;
    32 => ReadPixels,              "glReadPixels",              6, ByteCount, Output;
    33 => Scissor,                 "glScissor",                 4, Void,      None;
    34 => ShaderSource,            "glShaderSource",            3, Void,      Slot;
    35 => TexImage2D,              "glTexImage2D",              7, Void,      Input;
    36 => TexParameteri,           "glTexParameteri",           3, Void,      None;
    37 => Uniform1f,               "glUniform1f",               2, Void,      None;
    38 => Uniform4f,               "glUniform4f",               5, Void,      None;
    39 => Uniform4fv,              "glUniform4fv",              2, Void,      Input;
    40 => UseProgram,              "glUseProgram",              1, Void,      None;
    41 => VertexAttribPointer,     "glVertexAttribPointer",     6, Void,      None;
    42 => Viewport,                "glViewport",                4, Void,      None;
}

impl GlFn {
    /// Map a raw tag from across the boundary onto a dispatchable function.
    pub fn from_tag(tag: u32) -> Result<GlFn, DispatchError> {
        match GlFn::from_u32(tag) {
            Some(GlFn::Undefined) => Err(DispatchError::Undefined),
            Some(func) => Ok(func),
            None => Err(DispatchError::UnknownFunction(tag)),
        }
    }

    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn is_blocking(self) -> bool {
        self.schema().is_blocking()
    }

    /// Name of the matching constant in the C header, e.g. `glfnBindTexture`.
    pub fn c_name(self) -> String {
        match self {
            GlFn::Undefined => "glfnUNDEFINED".to_string(),
            func => format!("glfn{func:?}"),
        }
    }
}

impl fmt::Display for GlFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().symbol)
    }
}

// =====================================================================
// C-repr call record
// =====================================================================

/// One encoded GL call as it crosses the boundary (`struct fnargs`).
///
/// Only the first `schema().arity` slots are meaningful for a given tag.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FnArgs {
    pub func: u32,
    pub args: [usize; ARG_SLOTS],
}

impl FnArgs {
    pub fn new(func: GlFn) -> Self {
        Self {
            func: func.tag(),
            args: [0; ARG_SLOTS],
        }
    }

    pub fn function(&self) -> Result<GlFn, DispatchError> {
        GlFn::from_tag(self.func)
    }
}

/// Conversions between typed GL values and argument words.
///
/// Signed integers are stored sign-extended and read back by truncation;
/// floats travel as their IEEE-754 bit pattern in the low 32 bits.
pub mod word {
    pub fn from_i32(value: i32) -> usize {
        value as isize as usize
    }

    pub fn from_u32(value: u32) -> usize {
        value as usize
    }

    pub fn from_f32(value: f32) -> usize {
        value.to_bits() as usize
    }

    pub fn from_bool(value: bool) -> usize {
        usize::from(value)
    }

    pub fn to_i32(word: usize) -> i32 {
        word as i32
    }

    pub fn to_u32(word: usize) -> u32 {
        word as u32
    }

    pub fn to_f32(word: usize) -> f32 {
        f32::from_bits(word as u32)
    }

    pub fn to_bool(word: usize) -> bool {
        word != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_stable() {
        assert_eq!(GlFn::Undefined.tag(), 0);
        assert_eq!(GlFn::ActiveTexture.tag(), 1);
        assert_eq!(GlFn::BindTexture.tag(), 4);
        assert_eq!(GlFn::GetError.tag(), 25);
        assert_eq!(GlFn::ReadPixels.tag(), 32);
        assert_eq!(GlFn::Viewport.tag(), 42);
    }

    #[test]
    fn table_is_dense_and_ordered() {
        for (index, func) in GlFn::ALL.iter().enumerate() {
            assert_eq!(func.tag() as usize, index + 1, "{func:?}");
        }
    }

    #[test]
    fn arity_fits_in_record() {
        assert!(GlFn::ALL.iter().all(|f| f.schema().arity <= ARG_SLOTS));
        assert_eq!(GlFn::Flush.schema().arity, 0);
        assert_eq!(GlFn::TexImage2D.schema().arity, 7);
    }

    #[test]
    fn undefined_and_out_of_range_tags_are_rejected() {
        assert_eq!(GlFn::from_tag(0), Err(DispatchError::Undefined));
        assert_eq!(GlFn::from_tag(43), Err(DispatchError::UnknownFunction(43)));
        assert_eq!(
            GlFn::from_tag(u32::MAX),
            Err(DispatchError::UnknownFunction(u32::MAX))
        );
        assert_eq!(GlFn::from_tag(17), Ok(GlFn::DrawArrays));
    }

    #[test]
    fn blocking_follows_schema() {
        assert!(!GlFn::BindTexture.is_blocking());
        assert!(!GlFn::Flush.is_blocking());
        assert!(GlFn::GenBuffer.is_blocking());
        assert!(GlFn::BufferData.is_blocking());
        assert!(GlFn::ShaderSource.is_blocking());
        assert!(GlFn::ReadPixels.is_blocking());
    }

    #[test]
    fn float_words_keep_their_bits() {
        for value in [0.0f32, -0.0, 1.5, -273.15, f32::MIN_POSITIVE, f32::INFINITY] {
            assert_eq!(word::to_f32(word::from_f32(value)).to_bits(), value.to_bits());
        }
    }

    #[test]
    fn negative_ints_are_sign_extended() {
        assert_eq!(word::from_i32(-1), usize::MAX);
        assert_eq!(word::to_i32(word::from_i32(-1)), -1);
        assert_eq!(word::to_i32(word::from_i32(i32::MIN)), i32::MIN);
    }

    #[test]
    fn c_names_match_header_convention() {
        assert_eq!(GlFn::Undefined.c_name(), "glfnUNDEFINED");
        assert_eq!(GlFn::GetShaderiv.c_name(), "glfnGetShaderiv");
        assert_eq!(GlFn::TexImage2D.to_string(), "glTexImage2D");
    }

    #[test]
    fn checked_status_codes_never_collide() {
        assert_ne!(FN_SUCCESS, FN_REJECTED);
        assert_eq!(FN_SUCCESS, 0);
    }
}
