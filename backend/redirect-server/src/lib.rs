pub mod app;
pub mod configs;
pub mod error;
pub mod inbound;
pub mod logger;
pub mod server;
pub mod utils;
