//! Posting notifications through `Notification.Builder`.

use std::sync::atomic::{AtomicI32, Ordering};

use tracing::debug;

use crate::error::ShimError;
use crate::host::{Arg, HostEnv, LOCAL_FRAME_CAPACITY};
use crate::lookup::{resolve_class, resolve_method};
use crate::services::{get_system_service, sdk_version};

/// First API level that requires a notification channel.
pub const OREO_API_LEVEL: i32 = 26;

/// `NotificationManager.IMPORTANCE_HIGH`.
pub const IMPORTANCE_HIGH: i32 = 4;

/// Resource id of the platform's "unknown app" icon.
pub const UNKNOWN_APP_ICON: i32 = 17629184;

const BUILDER_CLASS: &str = "android/app/Notification$Builder";
const MANAGER_CLASS: &str = "android/app/NotificationManager";
const CHANNEL_CLASS: &str = "android/app/NotificationChannel";
const BUILDER_RETURN: &str = "Landroid/app/Notification$Builder;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub channel_id: String,
    /// User-visible channel name.
    pub channel_name: String,
    pub importance: i32,
    pub small_icon: i32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_id: "glwork-notif".to_owned(),
            channel_name: "glwork Notification".to_owned(),
            importance: IMPORTANCE_HIGH,
            small_icon: UNKNOWN_APP_ICON,
        }
    }
}

/// Posts notifications with ids unique to this notifier.
///
/// Ids start at 1 and grow by one for every notification handed to the
/// `NotificationManager`.
#[derive(Debug)]
pub struct Notifier {
    next_id: AtomicI32,
    config: NotificationConfig,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            next_id: AtomicI32::new(1),
            config,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Post a notification and return the id it was posted with.
    ///
    /// On API 26 and later the configured channel is (re)registered first;
    /// registering an existing channel id is a no-op on the platform side.
    /// Every local reference the post creates is released before returning.
    pub fn send<E: HostEnv>(
        &self,
        env: &mut E,
        ctx: &E::Object,
        title: &str,
        body: &str,
    ) -> Result<i32, ShimError> {
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| self.post(env, ctx, title, body))
    }

    fn post<E: HostEnv>(
        &self,
        env: &mut E,
        ctx: &E::Object,
        title: &str,
        body: &str,
    ) -> Result<i32, ShimError> {
        let title = env.new_string(title)?;
        let body = env.new_string(body)?;

        let builder_class = resolve_class(env, BUILDER_CLASS)?;
        let constructor = resolve_method(env, &builder_class, "<init>", "(Landroid/content/Context;)V")?;
        let builder = env.new_object(&builder_class, constructor, &[Arg::Object(ctx)])?;

        let manager_class = resolve_class(env, MANAGER_CLASS)?;
        let manager = get_system_service(env, ctx, "notification")?;

        if sdk_version(env)? >= OREO_API_LEVEL {
            self.register_channel(env, &manager_class, &manager, &builder_class, &builder)?;
        }

        let set_title = resolve_method(
            env,
            &builder_class,
            "setContentTitle",
            &builder_setter("Ljava/lang/CharSequence;"),
        )?;
        env.call_object_method(&builder, set_title, &[Arg::Object(&title)])?;

        let set_text = resolve_method(
            env,
            &builder_class,
            "setContentText",
            &builder_setter("Ljava/lang/CharSequence;"),
        )?;
        env.call_object_method(&builder, set_text, &[Arg::Object(&body)])?;

        let set_icon = resolve_method(env, &builder_class, "setSmallIcon", &builder_setter("I"))?;
        env.call_object_method(&builder, set_icon, &[Arg::Int(self.config.small_icon)])?;

        let build = resolve_method(env, &builder_class, "build", "()Landroid/app/Notification;")?;
        let notification = env.call_object_method(&builder, build, &[])?;

        let notify = resolve_method(env, &manager_class, "notify", "(ILandroid/app/Notification;)V")?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        env.call_void_method(&manager, notify, &[Arg::Int(id), Arg::Object(&notification)])?;

        debug!(id, "notification posted");
        Ok(id)
    }

    fn register_channel<E: HostEnv>(
        &self,
        env: &mut E,
        manager_class: &E::Class,
        manager: &E::Object,
        builder_class: &E::Class,
        builder: &E::Object,
    ) -> Result<(), ShimError> {
        let channel_id = env.new_string(&self.config.channel_id)?;
        let name = env.new_string(&self.config.channel_name)?;

        let channel_class = resolve_class(env, CHANNEL_CLASS)?;
        let constructor = resolve_method(
            env,
            &channel_class,
            "<init>",
            "(Ljava/lang/String;Ljava/lang/CharSequence;I)V",
        )?;
        let channel = env.new_object(
            &channel_class,
            constructor,
            &[
                Arg::Object(&channel_id),
                Arg::Object(&name),
                Arg::Int(self.config.importance),
            ],
        )?;

        let create = resolve_method(
            env,
            manager_class,
            "createNotificationChannel",
            "(Landroid/app/NotificationChannel;)V",
        )?;
        env.call_void_method(manager, create, &[Arg::Object(&channel)])?;

        let set_channel = resolve_method(
            env,
            builder_class,
            "setChannelId",
            &builder_setter("Ljava/lang/String;"),
        )?;
        env.call_object_method(builder, set_channel, &[Arg::Object(&channel_id)])?;

        debug!(channel = %self.config.channel_id, "notification channel registered");
        Ok(())
    }
}

fn builder_setter(param: &str) -> String {
    format!("({param}){BUILDER_RETURN}")
}
