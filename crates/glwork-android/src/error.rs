use thiserror::Error;

/// A host call failed below the shim, e.g. a JNI error or a thrown exception.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed: {0}")]
pub struct HostError(pub String);

#[cfg(target_os = "android")]
impl From<jni::errors::Error> for HostError {
    fn from(err: jni::errors::Error) -> Self {
        HostError(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShimError {
    #[error("cannot find class {name}")]
    ClassNotFound { name: String },

    #[error("cannot find method {name} {signature}")]
    MethodNotFound { name: String, signature: String },

    #[error("cannot find static field {name}")]
    FieldNotFound { name: String },

    #[error("C string argument is not valid UTF-8")]
    InvalidString,

    #[error(transparent)]
    Host(#[from] HostError),
}
