#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use axum::{body::Body, extract::ConnectInfo};
use redirect_server::{app, configs};

pub const CALLBACK_PATH: &str = "/payments/3ds/authorise";

/// Development configuration with the payment service pointed at `base_url`
///
/// # Panics
///
/// Will panic if the development configuration cannot be loaded
pub fn config_for(base_url: &str) -> configs::Config {
    let mut config = configs::Config::new_with_config_path(Some(
        configs::workspace_path()
            .join("config")
            .join("development.toml"),
    ))
    .expect("Failed while parsing config");
    config.connectors.adyen.base_url = base_url.to_string();
    config
}

pub fn service_for(base_url: &str) -> app::Service {
    app::Service::new(Arc::new(config_for(base_url)))
}

/// Form-encoded redirect as posted by the issuer's page
///
/// # Panics
///
/// Will panic if the request cannot be assembled
pub fn redirect_request(form: &str, peer: Option<SocketAddr>) -> http::Request<Body> {
    let mut request = http::Request::post(CALLBACK_PATH)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("user-agent", "TestAgent/1.0")
        .header("accept", "text/html")
        .body(Body::from(form.to_string()))
        .expect("Failed to build the redirect request");
    if let Some(peer) = peer {
        request.extensions_mut().insert(ConnectInfo(peer));
    }
    request
}

pub fn shopper_address() -> SocketAddr {
    SocketAddr::from(([203, 0, 113, 7], 52113))
}

/// # Panics
///
/// Will panic if the body cannot be collected or is not UTF-8
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read the response body");
    String::from_utf8(bytes.to_vec()).expect("response body is not utf-8")
}
