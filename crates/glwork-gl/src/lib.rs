//! Executes encoded GL calls against a driver.
//!
//! [`dispatch`] runs a typed [`GlCall`](glwork_core::GlCall) on any
//! [`GlBackend`]; [`process_fn`] does the same for a raw wire record. The
//! `processFn` C symbol exported from [`entry`] is the single ABI surface
//! host code links against.
//!
//! ### Warning
//!
//! The dispatcher does no context management. Whatever thread calls into
//! [`NativeGl`] must have the GL context current.

mod backend;
pub mod dispatch;
pub mod entry;
mod native;
pub mod queue;
pub mod recording;

pub use backend::GlBackend;
pub use dispatch::{dispatch, process_fn};
pub use native::{GlLoader, NativeGl};
pub use queue::{GlQueue, GlWorker};
pub use recording::{Invocation, RecordingGl};
