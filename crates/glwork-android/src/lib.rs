//! Native access to Android platform services.
//!
//! Everything here talks to the JVM through [`HostEnv`], so the service
//! logic runs unchanged against the real JNI environment ([`JniHost`], on
//! Android) and against an in-memory host in tests.
//!
//! Calls must come from a thread attached to the JVM, using the env handle
//! of that thread. Handles are never cached across calls.

pub mod error;
pub mod host;
pub mod logging;
pub mod lookup;
pub mod notify;
pub mod services;

#[cfg(target_os = "android")]
pub mod ffi;
#[cfg(target_os = "android")]
mod jni_host;

#[cfg(test)]
mod fake;

pub use error::{HostError, ShimError};
pub use host::{Arg, HostEnv};
pub use lookup::{resolve_class, resolve_method, resolve_static_int, resolve_static_method};
pub use notify::{NotificationConfig, Notifier};
pub use services::{get_system_service, open_url, parse_url, sdk_version};

#[cfg(target_os = "android")]
pub use jni_host::JniHost;
