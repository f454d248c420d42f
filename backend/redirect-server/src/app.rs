use crate::{
    configs, error::ConfigurationError, logger, server::health_check, server::payments, utils,
};
use axum::http;
use common_utils::consts;
use connector_integration::connectors::Adyen;
use external_services::{service::ConnectorAuthorizationClient, shared_metrics as metrics};
use interfaces::authorization::AuthorizationClient;
use std::{future::Future, net, sync::Arc};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::oneshot,
};
use tower_http::{request_id::MakeRequestUuid, trace as tower_trace};

const HEALTH_PATH: &str = "/health";

/// # Panics
///
/// Will panic if signal handling fails
pub async fn server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let server_config = config.server.clone();
    let socket_addr = net::SocketAddr::new(server_config.host.parse()?, server_config.port);

    // Signal handler
    let (tx, rx) = oneshot::channel();

    #[allow(clippy::expect_used)]
    tokio::spawn(async move {
        let mut sig_int =
            signal(SignalKind::interrupt()).expect("Failed to initialize SIGINT signal handler");
        let mut sig_term =
            signal(SignalKind::terminate()).expect("Failed to initialize SIGTERM signal handler");
        let mut sig_quit =
            signal(SignalKind::quit()).expect("Failed to initialize QUIT signal handler");
        let mut sig_hup =
            signal(SignalKind::hangup()).expect("Failed to initialize SIGHUP signal handler");

        tokio::select! {
            _ = sig_int.recv() => {
                logger::info!("Received SIGINT");
                tx.send(()).expect("Failed to send SIGINT signal");
            }
            _ = sig_term.recv() => {
                logger::info!("Received SIGTERM");
                tx.send(()).expect("Failed to send SIGTERM signal");
            }
            _ = sig_quit.recv() => {
                logger::info!("Received QUIT");
                tx.send(()).expect("Failed to send QUIT signal");
            }
            _ = sig_hup.recv() => {
                logger::info!("Received SIGHUP");
                tx.send(()).expect("Failed to send SIGHUP signal");
            }
        }
    });

    #[allow(clippy::expect_used)]
    let shutdown_signal = async {
        rx.await.expect("Failed to receive shutdown signal");
        logger::info!("Shutdown signal received");
    };

    let service = Service::new(Arc::new(config));

    logger::info!(
        host = %server_config.host,
        port = %server_config.port,
        callback_path = %server_config.callback_path,
        "starting redirect service"
    );

    service.http_server(socket_addr, shutdown_signal).await?;

    Ok(())
}

pub struct Service {
    pub config: Arc<configs::Config>,
    pub payments_service: payments::Payments,
}

impl Service {
    /// Service talking to the payment service named in the connector configuration
    pub fn new(config: Arc<configs::Config>) -> Self {
        let authorization_client: Arc<dyn AuthorizationClient> =
            Arc::new(ConnectorAuthorizationClient::new(
                config.proxy.clone(),
                config.connectors.clone(),
                Box::new(Adyen::new()),
            ));
        Self::with_authorization_client(config, authorization_client)
    }

    pub fn with_authorization_client(
        config: Arc<configs::Config>,
        authorization_client: Arc<dyn AuthorizationClient>,
    ) -> Self {
        Self {
            payments_service: payments::Payments {
                config: Arc::clone(&config),
                authorization_client,
            },
            config,
        }
    }

    pub fn router(&self) -> axum::Router {
        let callback_path = self.config.server.callback_path.as_str();

        let logging_layer = tower_trace::TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                utils::record_fields_from_header(request)
            })
            .on_request(tower_trace::DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(
                tower_trace::DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(tower_http::LatencyUnit::Micros),
            )
            .on_failure(
                tower_trace::DefaultOnFailure::new()
                    .latency_unit(tower_http::LatencyUnit::Micros)
                    .level(tracing::Level::ERROR),
            );

        let metrics_layer =
            metrics::HttpMetricsLayer::new([HEALTH_PATH.to_string(), callback_path.to_string()]);

        let request_id_layer = tower_http::request_id::SetRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
            MakeRequestUuid,
        );

        let propagate_request_id_layer = tower_http::request_id::PropagateRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
        );

        // Layers wrap outwards; the request id is set before the trace span is made.
        axum::Router::new()
            .route(HEALTH_PATH, axum::routing::get(health_check::health))
            .route(
                callback_path,
                axum::routing::post(payments::authorise_3d_callback),
            )
            .with_state(self.payments_service.clone())
            .layer(metrics_layer)
            .layer(logging_layer)
            .layer(propagate_request_id_layer)
            .layer(request_id_layer)
    }

    pub async fn http_server(
        self,
        socket: net::SocketAddr,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ConfigurationError> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(socket).await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<net::SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await?;

        Ok(())
    }
}

pub async fn metrics_server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let listener = config.metrics.tcp_listener().await?;

    let router = axum::Router::new().route(
        "/metrics",
        axum::routing::get(|| async {
            let output = metrics::metrics_handler().await;
            match output {
                Ok(metrics) => Ok(metrics),
                Err(error) => {
                    tracing::error!(?error, "Error fetching metrics");

                    Err((
                        http::StatusCode::INTERNAL_SERVER_ERROR,
                        "Error fetching metrics".to_string(),
                    ))
                }
            }
        }),
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            let output = tokio::signal::ctrl_c().await;
            tracing::error!(?output, "shutting down");
        })
        .await?;

    Ok(())
}
