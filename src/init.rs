use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Settings for [`init_tracing_with_config`].
///
/// The client never installs a subscriber on its own; applications that
/// do not already have one can use these helpers so that reports from
/// [`TracingSink`](crate::sink::TracingSink) reach the console.
///
/// **Fields**
/// - `enable_stdout`: attach a `fmt` layer. With `false` the subscriber
///   is installed but prints nothing.
/// - `with_target`: include the event target (`logship_client`) in each line.
/// - `ansi`: colorize the output.
#[derive(Clone, Debug)]
pub struct SubscriberConfig {
    pub enable_stdout: bool,
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            with_target: true,
            ansi: true,
        }
    }
}

/// Error returned when a global subscriber is already installed.
#[derive(thiserror::Error, Debug)]
#[error("a global tracing subscriber is already set")]
pub struct InitError(#[from] tracing::subscriber::SetGlobalDefaultError);

/// Install a global `tracing` subscriber built from `config`.
///
/// **Returns**
/// - `Err(InitError)` if the process already has a global subscriber.
pub fn init_tracing_with_config(config: SubscriberConfig) -> Result<(), InitError> {
    // Both branches need their own concrete subscriber type.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(config.with_target)
            .with_ansi(config.ansi);
        let subscriber = Registry::default().with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        tracing::subscriber::set_global_default(Registry::default())?;
    }
    Ok(())
}

/// Install a console subscriber with [`SubscriberConfig::default`].
pub fn init_tracing() -> Result<(), InitError> {
    init_tracing_with_config(SubscriberConfig::default())
}
