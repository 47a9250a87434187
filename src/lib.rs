pub mod caller;
pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod record;
pub mod sink;
pub mod timestamp;

pub mod init;
pub mod noop_sink;

pub use client::{LogClient, LogClientBuilder};
pub use config::Config;
pub use env::Environment;
pub use error::LogClientError;
pub use record::{Level, LogEvent};
