pub mod config;

pub mod setup;
pub use setup::setup;

pub mod env;

pub use tracing::info;
