use jni::objects::{JClass, JMethodID, JObject, JStaticMethodID, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jvalue;
use jni::JNIEnv;

use crate::error::HostError;
use crate::host::{Arg, HostEnv};

/// [`HostEnv`] over the JNI env of the current thread.
pub struct JniHost<'a, 'local> {
    env: &'a mut JNIEnv<'local>,
}

impl<'a, 'local> JniHost<'a, 'local> {
    pub fn new(env: &'a mut JNIEnv<'local>) -> Self {
        Self { env }
    }

    pub fn env(&mut self) -> &mut JNIEnv<'local> {
        self.env
    }
}

fn to_jni(args: &[Arg<'_, JObject<'_>>]) -> Vec<jvalue> {
    args.iter()
        .map(|arg| match *arg {
            Arg::Object(object) => JValue::Object(object).as_jni(),
            Arg::Int(value) => JValue::Int(value).as_jni(),
        })
        .collect()
}

impl<'a, 'local> HostEnv for JniHost<'a, 'local> {
    type Object = JObject<'local>;
    type Class = JClass<'local>;
    type Method = JMethodID;
    type StaticMethod = JStaticMethodID;

    fn find_class(&mut self, name: &str) -> Result<Self::Class, HostError> {
        Ok(self.env.find_class(name)?)
    }

    fn clear_exception(&mut self) {
        let _ = self.env.exception_clear();
    }

    fn with_local_frame<R, E, F>(&mut self, capacity: i32, f: F) -> Result<R, E>
    where
        E: From<HostError>,
        F: FnOnce(&mut Self) -> Result<R, E>,
    {
        self.env
            .push_local_frame(capacity)
            .map_err(|err| E::from(HostError::from(err)))?;
        let result = f(self);
        // SAFETY: nothing created inside the frame is used after this point.
        if let Err(err) = unsafe { self.env.pop_local_frame(&JObject::null()) } {
            tracing::warn!("cannot pop JNI local frame: {err}");
        }
        result
    }

    fn method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Method, HostError> {
        Ok(self.env.get_method_id(class, name, signature)?)
    }

    fn static_method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::StaticMethod, HostError> {
        Ok(self.env.get_static_method_id(class, name, signature)?)
    }

    fn object_class(&mut self, object: &Self::Object) -> Result<Self::Class, HostError> {
        Ok(self.env.get_object_class(object)?)
    }

    fn new_string(&mut self, text: &str) -> Result<Self::Object, HostError> {
        Ok(JObject::from(self.env.new_string(text)?))
    }

    fn static_int_field(&mut self, class: &Self::Class, name: &str) -> Result<i32, HostError> {
        Ok(self.env.get_static_field(class, name, "I")?.i()?)
    }

    fn static_object_field(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Object, HostError> {
        Ok(self.env.get_static_field(class, name, signature)?.l()?)
    }

    fn new_object(
        &mut self,
        class: &Self::Class,
        constructor: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError> {
        let args = to_jni(args);
        // SAFETY: method ids come from lookups on the same class with the
        // descriptor the arguments were built for.
        Ok(unsafe { self.env.new_object_unchecked(class, constructor, &args) }?)
    }

    fn call_object_method(
        &mut self,
        object: &Self::Object,
        method: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError> {
        let args = to_jni(args);
        let ret = unsafe {
            self.env
                .call_method_unchecked(object, method, ReturnType::Object, &args)
        }?;
        Ok(ret.l()?)
    }

    fn call_void_method(
        &mut self,
        object: &Self::Object,
        method: Self::Method,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<(), HostError> {
        let args = to_jni(args);
        unsafe {
            self.env.call_method_unchecked(
                object,
                method,
                ReturnType::Primitive(Primitive::Void),
                &args,
            )
        }?;
        Ok(())
    }

    fn call_static_object_method(
        &mut self,
        class: &Self::Class,
        method: Self::StaticMethod,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, HostError> {
        let args = to_jni(args);
        let ret = unsafe {
            self.env
                .call_static_method_unchecked(class, method, ReturnType::Object, &args)
        }?;
        Ok(ret.l()?)
    }
}
