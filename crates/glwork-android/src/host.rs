//! The slice of the JNI surface the shim needs.

use crate::error::HostError;

/// Local references a single shim operation may hold at once.
pub const LOCAL_FRAME_CAPACITY: i32 = 32;

/// An argument to a host method or constructor.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a, O> {
    Object(&'a O),
    Int(i32),
}

/// A JVM environment bound to the current thread.
///
/// Method ids are plain values; objects and classes are local references
/// valid until the native frame returns.
pub trait HostEnv {
    type Object;
    type Class;
    type Method: Copy;
    type StaticMethod: Copy;

    fn find_class(&mut self, name: &str) -> Result<Self::Class, HostError>;

    /// Clear any exception left pending by a failed call.
    fn clear_exception(&mut self);

    /// Run `f` inside a fresh local reference frame. Every local reference
    /// created by `f` is released when it returns, so nothing it creates may
    /// escape.
    fn with_local_frame<R, E, F>(&mut self, capacity: i32, f: F) -> Result<R, E>
    where
        E: From<HostError>,
        F: FnOnce(&mut Self) -> Result<R, E>;

    fn method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Method, HostError>;

    fn static_method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::StaticMethod, HostError>;

    fn object_class(&mut self, object: &Self::Object) -> Result<Self::Class, HostError>;

    fn new_string(&mut self, text: &str) -> Result<Self::Object, HostError>;

    fn static_int_field(&mut self, class: &Self::Class, name: &str) -> Result<i32, HostError>;

    fn static_object_field(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Object, HostError>;

    fn new_object(
        &mut self,
        class: &Self::Class,
        constructor: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError>;

    fn call_object_method(
        &mut self,
        object: &Self::Object,
        method: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError>;

    fn call_void_method(
        &mut self,
        object: &Self::Object,
        method: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<(), HostError>;

    fn call_static_object_method(
        &mut self,
        class: &Self::Class,
        method: Self::StaticMethod,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError>;
}
