//! In-memory JVM used by the unit tests.

use std::collections::HashSet;

use crate::error::HostError;
use crate::host::{Arg, HostEnv};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeObject {
    pub class: String,
    pub text: Option<String>,
}

impl FakeObject {
    pub fn instance(class: &str) -> Self {
        Self {
            class: class.to_owned(),
            text: None,
        }
    }

    pub fn text(class: &str, text: &str) -> Self {
        Self {
            class: class.to_owned(),
            text: Some(text.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeMethod(usize);

/// A recorded constructor or method call with its flattened arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    pub name: String,
    pub strings: Vec<String>,
    pub ints: Vec<i32>,
}

#[derive(Debug)]
pub struct FakeHost {
    pub sdk: i32,
    pub classes: HashSet<String>,
    pub missing_methods: HashSet<String>,
    pub calls: Vec<FakeCall>,
    pub exceptions_cleared: usize,
    /// Local references currently alive across all frames.
    pub live_locals: usize,
    pub frames_popped: usize,
    frames: Vec<usize>,
    /// (name, signature) per method id handed out.
    methods: Vec<(String, String)>,
}

impl FakeHost {
    pub fn new(sdk: i32) -> Self {
        let classes = [
            "android/os/Build$VERSION",
            "android/net/Uri",
            "android/content/Context",
            "android/content/Intent",
            "android/app/Notification$Builder",
            "android/app/NotificationManager",
            "android/app/NotificationChannel",
        ];
        Self {
            sdk,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            missing_methods: HashSet::new(),
            calls: Vec::new(),
            exceptions_cleared: 0,
            live_locals: 0,
            frames_popped: 0,
            frames: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn context(&self) -> FakeObject {
        FakeObject::instance("android/content/Context")
    }

    fn lookup(&mut self, name: &str, signature: &str) -> Result<FakeMethod, HostError> {
        if self.missing_methods.contains(name) {
            return Err(HostError(format!("NoSuchMethodError: {name}")));
        }
        self.methods.push((name.to_owned(), signature.to_owned()));
        Ok(FakeMethod(self.methods.len() - 1))
    }

    fn local<T>(&mut self, value: T) -> T {
        self.live_locals += 1;
        value
    }

    fn record(&mut self, name: String, args: &[Arg<'_, FakeObject>]) {
        let mut call = FakeCall {
            name,
            strings: Vec::new(),
            ints: Vec::new(),
        };
        for arg in args {
            match arg {
                Arg::Object(object) => call.strings.extend(object.text.clone()),
                Arg::Int(value) => call.ints.push(*value),
            }
        }
        self.calls.push(call);
    }

    /// Object of the type named by the method's return descriptor.
    fn returned(&self, method: FakeMethod) -> FakeObject {
        let (_, signature) = &self.methods[method.0];
        let ret = signature.rsplit(')').next().unwrap_or_default();
        let class = ret
            .strip_prefix('L')
            .and_then(|r| r.strip_suffix(';'))
            .unwrap_or(ret);
        FakeObject::instance(class)
    }
}

impl HostEnv for FakeHost {
    type Object = FakeObject;
    type Class = String;
    type Method = FakeMethod;
    type StaticMethod = FakeMethod;

    fn find_class(&mut self, name: &str) -> Result<String, HostError> {
        if self.classes.contains(name) {
            Ok(self.local(name.to_owned()))
        } else {
            Err(HostError(format!("ClassNotFoundException: {name}")))
        }
    }

    fn clear_exception(&mut self) {
        self.exceptions_cleared += 1;
    }

    fn with_local_frame<R, E, F>(&mut self, _capacity: i32, f: F) -> Result<R, E>
    where
        E: From<HostError>,
        F: FnOnce(&mut Self) -> Result<R, E>,
    {
        self.frames.push(self.live_locals);
        let result = f(self);
        if let Some(mark) = self.frames.pop() {
            self.live_locals = mark;
        }
        self.frames_popped += 1;
        result
    }

    fn method_id(&mut self, _class: &String, name: &str, signature: &str) -> Result<FakeMethod, HostError> {
        self.lookup(name, signature)
    }

    fn static_method_id(
        &mut self,
        _class: &String,
        name: &str,
        signature: &str,
    ) -> Result<FakeMethod, HostError> {
        self.lookup(name, signature)
    }

    fn object_class(&mut self, object: &FakeObject) -> Result<String, HostError> {
        Ok(self.local(object.class.clone()))
    }

    fn new_string(&mut self, text: &str) -> Result<FakeObject, HostError> {
        Ok(self.local(FakeObject::text("java/lang/String", text)))
    }

    fn static_int_field(&mut self, class: &String, name: &str) -> Result<i32, HostError> {
        match (class.as_str(), name) {
            ("android/os/Build$VERSION", "SDK_INT") => Ok(self.sdk),
            _ => Err(HostError(format!("NoSuchFieldError: {name}"))),
        }
    }

    fn static_object_field(
        &mut self,
        class: &String,
        name: &str,
        _signature: &str,
    ) -> Result<FakeObject, HostError> {
        match (class.as_str(), name) {
            ("android/content/Intent", "ACTION_VIEW") => Ok(self.local(FakeObject::text(
                "java/lang/String",
                "android.intent.action.VIEW",
            ))),
            _ => Err(HostError(format!("NoSuchFieldError: {name}"))),
        }
    }

    fn new_object(
        &mut self,
        class: &String,
        _constructor: FakeMethod,
        args: &[Arg<'_, FakeObject>],
    ) -> Result<FakeObject, HostError> {
        self.record(format!("{class}.<init>"), args);
        Ok(self.local(FakeObject::instance(class)))
    }

    fn call_object_method(
        &mut self,
        _object: &FakeObject,
        method: FakeMethod,
        args: &[Arg<'_, FakeObject>],
    ) -> Result<FakeObject, HostError> {
        let name = self.methods[method.0].0.clone();
        self.record(name, args);
        let returned = self.returned(method);
        Ok(self.local(returned))
    }

    fn call_void_method(
        &mut self,
        _object: &FakeObject,
        method: FakeMethod,
        args: &[Arg<'_, FakeObject>],
    ) -> Result<(), HostError> {
        let name = self.methods[method.0].0.clone();
        self.record(name, args);
        Ok(())
    }

    fn call_static_object_method(
        &mut self,
        class: &String,
        method: FakeMethod,
        args: &[Arg<'_, FakeObject>],
    ) -> Result<FakeObject, HostError> {
        let name = self.methods[method.0].0.clone();
        self.record(name, args);
        let text = args.iter().find_map(|arg| match arg {
            Arg::Object(object) => object.text.clone(),
            Arg::Int(_) => None,
        });
        Ok(self.local(FakeObject {
            class: class.clone(),
            text,
        }))
    }
}
