//! Class, method and field lookup with exception cleanup.
//!
//! A failed lookup leaves a Java exception pending; it is cleared before the
//! error is returned so the env stays usable.

use tracing::error;

use crate::error::ShimError;
use crate::host::HostEnv;

pub fn resolve_class<E: HostEnv>(env: &mut E, name: &str) -> Result<E::Class, ShimError> {
    env.find_class(name).map_err(|err| {
        env.clear_exception();
        error!("cannot find {name}: {err}");
        ShimError::ClassNotFound {
            name: name.to_owned(),
        }
    })
}

pub fn resolve_method<E: HostEnv>(
    env: &mut E,
    class: &E::Class,
    name: &str,
    signature: &str,
) -> Result<E::Method, ShimError> {
    env.method_id(class, name, signature).map_err(|err| {
        env.clear_exception();
        error!("cannot find method {name} {signature}: {err}");
        method_not_found(name, signature)
    })
}

pub fn resolve_static_method<E: HostEnv>(
    env: &mut E,
    class: &E::Class,
    name: &str,
    signature: &str,
) -> Result<E::StaticMethod, ShimError> {
    env.static_method_id(class, name, signature).map_err(|err| {
        env.clear_exception();
        error!("cannot find static method {name} {signature}: {err}");
        method_not_found(name, signature)
    })
}

/// Read a static `int` field, e.g. `Build.VERSION.SDK_INT`.
pub fn resolve_static_int<E: HostEnv>(
    env: &mut E,
    class: &E::Class,
    name: &str,
) -> Result<i32, ShimError> {
    env.static_int_field(class, name).map_err(|err| {
        env.clear_exception();
        error!("cannot read static field {name}: {err}");
        ShimError::FieldNotFound {
            name: name.to_owned(),
        }
    })
}

fn method_not_found(name: &str, signature: &str) -> ShimError {
    ShimError::MethodNotFound {
        name: name.to_owned(),
        signature: signature.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeHost;

    #[test]
    fn unknown_class_is_reported_and_cleared() {
        let mut env = FakeHost::new(30);
        let err = resolve_class(&mut env, "com/example/Missing").unwrap_err();
        assert_eq!(
            err,
            ShimError::ClassNotFound {
                name: "com/example/Missing".to_owned()
            }
        );
        assert_eq!(env.exceptions_cleared, 1);
    }

    #[test]
    fn missing_method_names_its_signature() {
        let mut env = FakeHost::new(30);
        env.missing_methods.insert("vanish".to_owned());
        let class = resolve_class(&mut env, "android/content/Context").unwrap();

        let err = resolve_method(&mut env, &class, "vanish", "()V").unwrap_err();
        assert_eq!(
            err,
            ShimError::MethodNotFound {
                name: "vanish".to_owned(),
                signature: "()V".to_owned()
            }
        );
        let err = resolve_static_method(&mut env, &class, "vanish", "()V").unwrap_err();
        assert!(matches!(err, ShimError::MethodNotFound { .. }));
        assert_eq!(env.exceptions_cleared, 2);
    }

    #[test]
    fn static_int_reads_and_misses() {
        let mut env = FakeHost::new(26);
        let version = resolve_class(&mut env, "android/os/Build$VERSION").unwrap();
        assert_eq!(resolve_static_int(&mut env, &version, "SDK_INT"), Ok(26));
        assert_eq!(
            resolve_static_int(&mut env, &version, "CODENAME_INT"),
            Err(ShimError::FieldNotFound {
                name: "CODENAME_INT".to_owned()
            })
        );
    }
}
