//! C entry points taking raw `JNIEnv*` and `jobject` context addresses.
//!
//! Failures are logged; object-returning functions then yield null.
//! `openURL` and `sendNotification` run inside a local reference frame, so
//! repeated calls from a long-lived native thread do not grow the local table.
//! The objects returned by `getSystemService` and `parseURL` are local
//! references owned by the caller.

use std::ffi::{c_char, c_int, CStr};

use jni::objects::JObject;
use jni::sys::jobject;
use jni::JNIEnv;
use once_cell::sync::Lazy;
use tracing::error;

use crate::error::{HostError, ShimError};
use crate::jni_host::JniHost;
use crate::notify::Notifier;
use crate::services;

static NOTIFIER: Lazy<Notifier> = Lazy::new(Notifier::default);

unsafe fn c_str<'s>(ptr: *const c_char) -> Result<&'s str, ShimError> {
    if ptr.is_null() {
        return Err(ShimError::InvalidString);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| ShimError::InvalidString)
}

/// Run `f` with a host wrapping `jni_env` and the context object.
unsafe fn with_host<R>(
    what: &str,
    jni_env: usize,
    ctx: usize,
    f: impl for<'a, 'local> FnOnce(&mut JniHost<'a, 'local>, &JObject<'local>) -> Result<R, ShimError>,
) -> Option<R> {
    let result = unsafe { JNIEnv::from_raw(jni_env as *mut jni::sys::JNIEnv) }
        .map_err(|err| ShimError::Host(HostError::from(err)))
        .and_then(|mut env| {
            let ctx = unsafe { JObject::from_raw(ctx as jobject) };
            f(&mut JniHost::new(&mut env), &ctx)
        });
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!("{what} failed: {err}");
            None
        }
    }
}

/// # Safety
///
/// `jni_env` must be the `JNIEnv*` of the calling thread and `ctx` a live
/// `android.content.Context` reference; `service` a NUL-terminated string.
#[export_name = "getSystemService"]
pub unsafe extern "C" fn get_system_service_c(
    jni_env: usize,
    ctx: usize,
    service: *const c_char,
) -> jobject {
    unsafe {
        with_host("getSystemService", jni_env, ctx, |host, ctx| {
            let service = c_str(service)?;
            Ok(services::get_system_service(host, ctx, service)?.into_raw())
        })
    }
    .unwrap_or(std::ptr::null_mut())
}

/// # Safety
///
/// As for `getSystemService`.
#[export_name = "parseURL"]
pub unsafe extern "C" fn parse_url_c(jni_env: usize, ctx: usize, url: *const c_char) -> jobject {
    unsafe {
        with_host("parseURL", jni_env, ctx, |host, _ctx| {
            let url = c_str(url)?;
            Ok(services::parse_url(host, url)?.into_raw())
        })
    }
    .unwrap_or(std::ptr::null_mut())
}

/// # Safety
///
/// As for `getSystemService`. `java_vm` is accepted for ABI compatibility
/// and not used.
#[export_name = "openURL"]
pub unsafe extern "C" fn open_url_c(_java_vm: usize, jni_env: usize, ctx: usize, url: *const c_char) {
    unsafe {
        with_host("openURL", jni_env, ctx, |host, ctx| {
            services::open_url(host, ctx, c_str(url)?)
        });
    }
}

/// Post a notification through the process-wide notifier.
///
/// Returns the notification id, or `0` if nothing was posted.
///
/// # Safety
///
/// As for `openURL`; `title` and `body` must be NUL-terminated strings.
#[export_name = "sendNotification"]
pub unsafe extern "C" fn send_notification_c(
    _java_vm: usize,
    jni_env: usize,
    ctx: usize,
    title: *const c_char,
    body: *const c_char,
) -> c_int {
    unsafe {
        with_host("sendNotification", jni_env, ctx, |host, ctx| {
            let title = c_str(title)?;
            let body = c_str(body)?;
            NOTIFIER.send(host, ctx, title, body)
        })
    }
    .unwrap_or(0)
}
