pub mod connector_types;
pub mod errors;
pub mod redirect;
pub mod router_data;
pub mod types;
