pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod services;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;
pub use store::models::{ChannelId, UserId};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for a host binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
