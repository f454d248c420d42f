pub mod api;
pub mod authorization;
pub mod connector_integration;
