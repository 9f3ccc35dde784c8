//! Context services, URL intents and platform version.

use tracing::debug;

use crate::error::ShimError;
use crate::host::{Arg, HostEnv, LOCAL_FRAME_CAPACITY};
use crate::lookup::{resolve_class, resolve_method, resolve_static_int, resolve_static_method};

/// `Context.getSystemService(name)`, e.g. `"notification"`.
pub fn get_system_service<E: HostEnv>(
    env: &mut E,
    ctx: &E::Object,
    name: &str,
) -> Result<E::Object, ShimError> {
    let service = env.new_string(name)?;
    let class = env.object_class(ctx)?;
    let method = resolve_method(
        env,
        &class,
        "getSystemService",
        "(Ljava/lang/String;)Ljava/lang/Object;",
    )?;
    Ok(env.call_object_method(ctx, method, &[Arg::Object(&service)])?)
}

/// `android.net.Uri.parse(url)`.
pub fn parse_url<E: HostEnv>(env: &mut E, url: &str) -> Result<E::Object, ShimError> {
    let text = env.new_string(url)?;
    let class = resolve_class(env, "android/net/Uri")?;
    let parse = resolve_static_method(env, &class, "parse", "(Ljava/lang/String;)Landroid/net/Uri;")?;
    Ok(env.call_static_object_method(&class, parse, &[Arg::Object(&text)])?)
}

/// Start an `ACTION_VIEW` activity for `url`. The intermediate references
/// are released before returning.
pub fn open_url<E: HostEnv>(env: &mut E, ctx: &E::Object, url: &str) -> Result<(), ShimError> {
    env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| start_view_activity(env, ctx, url))
}

fn start_view_activity<E: HostEnv>(env: &mut E, ctx: &E::Object, url: &str) -> Result<(), ShimError> {
    let uri = parse_url(env, url)?;

    let intent_class = resolve_class(env, "android/content/Intent")?;
    let view = env
        .static_object_field(&intent_class, "ACTION_VIEW", "Ljava/lang/String;")
        .map_err(|err| {
            env.clear_exception();
            tracing::error!("cannot read Intent.ACTION_VIEW: {err}");
            ShimError::FieldNotFound {
                name: "ACTION_VIEW".to_owned(),
            }
        })?;
    let constructor = resolve_method(
        env,
        &intent_class,
        "<init>",
        "(Ljava/lang/String;Landroid/net/Uri;)V",
    )?;
    let intent = env.new_object(
        &intent_class,
        constructor,
        &[Arg::Object(&view), Arg::Object(&uri)],
    )?;

    let context_class = resolve_class(env, "android/content/Context")?;
    let start = resolve_method(
        env,
        &context_class,
        "startActivity",
        "(Landroid/content/Intent;)V",
    )?;
    env.call_void_method(ctx, start, &[Arg::Object(&intent)])?;
    debug!("opened {url}");
    Ok(())
}

/// `android.os.Build.VERSION.SDK_INT`.
pub fn sdk_version<E: HostEnv>(env: &mut E) -> Result<i32, ShimError> {
    let class = resolve_class(env, "android/os/Build$VERSION")?;
    resolve_static_int(env, &class, "SDK_INT")
}
