//! Shared vocabulary of the GL call bridge.
//!
//! - [`GlFn`] numbers the supported GL entry points.
//! - [`FnArgs`] is the fixed-shape record that crosses the C boundary.
//! - [`GlCall`] is the same call with typed arguments.
//!
//! Dispatching calls to a driver lives in `glwork-gl`.

pub mod call;
pub mod error;
pub mod ffi;
pub mod handles;
pub mod header;
pub mod logging;
pub mod pixels;

pub use call::{Decoded, GlCall, RawCall};
pub use error::DispatchError;
pub use ffi::{word, FnArgs, GlFn, PointerUse, ResultKind, Schema, FN_FAIL};
pub use handles::*;
