use std::{str::FromStr, time::Duration};

use common_utils::{
    consts::REDACTED,
    request::{Headers, Method, Request, RequestContent, Response},
    CustomResult,
};
use domain_types::{
    connector_types::{AuthorizationOutcome, SecondPhaseAuthorizationRequest},
    errors::{ApiClientError, AuthorizationError},
    types::{Connectors, Proxy},
};
use error_stack::{report, ResultExt};
use interfaces::{
    authorization::AuthorizationClient, connector_integration::BoxedConnectorIntegration,
};
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

use crate::shared_metrics as metrics;

/// Authorisation client that talks to a payment service through a connector integration
pub struct ConnectorAuthorizationClient {
    proxy: Proxy,
    connectors: Connectors,
    connector: BoxedConnectorIntegration,
    clients: HttpClients,
}

impl ConnectorAuthorizationClient {
    pub fn new(proxy: Proxy, connectors: Connectors, connector: BoxedConnectorIntegration) -> Self {
        Self {
            proxy,
            connectors,
            connector,
            clients: HttpClients::default(),
        }
    }
}

#[async_trait::async_trait]
impl AuthorizationClient for ConnectorAuthorizationClient {
    async fn authorize_3d(
        &self,
        request: SecondPhaseAuthorizationRequest,
    ) -> CustomResult<AuthorizationOutcome, AuthorizationError> {
        execute_connector_processing_step(
            &self.clients,
            &self.proxy,
            &self.connectors,
            self.connector.clone(),
            &request,
        )
        .await
    }
}

pub async fn execute_connector_processing_step(
    clients: &HttpClients,
    proxy: &Proxy,
    connectors: &Connectors,
    connector: BoxedConnectorIntegration,
    request: &SecondPhaseAuthorizationRequest,
) -> CustomResult<AuthorizationOutcome, AuthorizationError> {
    let span = tracing::info_span!(
        "outgoing_api",
        request_headers = Empty,
        request_body = Empty,
        response_headers = Empty,
        response_body = Empty,
        status_code = Empty,
        latency = Empty,
        method = Empty,
        url = Empty,
    );
    process_step(clients, proxy, connectors, connector, request)
        .instrument(span)
        .await
}

async fn process_step(
    clients: &HttpClients,
    proxy: &Proxy,
    connectors: &Connectors,
    connector: BoxedConnectorIntegration,
    request: &SecondPhaseAuthorizationRequest,
) -> CustomResult<AuthorizationOutcome, AuthorizationError> {
    let start = tokio::time::Instant::now();
    let connector_name = connector.id();

    let connector_request = connector
        .build_request(request, connectors)
        .change_context(AuthorizationError::RequestNotBuilt)
        .attach_printable("Failed to build the connector request; nothing was sent")?;

    let method = connector_request.method.to_string();
    let url = connector_request.url.clone();
    let masked_headers = connector_request.masked_headers();
    let masked_body = connector_request
        .body
        .as_ref()
        .map(RequestContent::masked_json)
        .unwrap_or(Value::Null);

    let current_span = tracing::Span::current();
    current_span.record("url", tracing::field::display(&url));
    current_span.record("method", tracing::field::display(&method));
    current_span.record("request_headers", tracing::field::display(&masked_headers));
    current_span.record("request_body", tracing::field::display(&masked_body));
    tracing::info!(request = %masked_body, "request of connector");

    metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
        .with_label_values(&[&method, "authorise_3d", connector_name])
        .inc();

    let response = call_connector_api(clients, proxy, connector_request)
        .await
        .inspect_err(|err| {
            info_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    err
                )),
            );
        });

    metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
        .with_label_values(&[&method, "authorise_3d", connector_name])
        .observe(start.elapsed().as_secs_f64());

    let result = match response {
        Ok(Ok(body)) => {
            record_response(&body);
            connector
                .handle_response(body)
                .change_context(AuthorizationError::TransportError)
                .attach_printable("Payment service answered with an undecodable success body")
        }
        Ok(Err(body)) => {
            record_response(&body);
            let status_code = body.status_code;
            let error_response = match status_code {
                500..=599 => connector.get_5xx_error_response(body),
                _ => connector.get_error_response(body),
            };
            match error_response {
                Ok(error_response) => Err(report!(AuthorizationError::from(error_response))),
                Err(err) => Err(err
                    .change_context(AuthorizationError::TransportError)
                    .attach_printable(format!(
                        "Payment service failed with status {status_code} and no declared fault"
                    ))),
            }
        }
        Err(err) => Err(err.change_context(AuthorizationError::TransportError)),
    };

    match &result {
        Ok(outcome) => {
            metrics::AUTHORISE_3D_OUTCOMES
                .with_label_values(&[connector_name, outcome.result_code().as_str()])
                .inc();
        }
        Err(err) => {
            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                .with_label_values(&[
                    &method,
                    "authorise_3d",
                    connector_name,
                    err.current_context().class(),
                ])
                .inc();
        }
    }

    tracing::Span::current().record("latency", start.elapsed().as_millis());
    tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    result
}

fn record_response(body: &Response) {
    let current_span = tracing::Span::current();
    current_span.record("status_code", body.status_code);

    let headers = body.headers.clone().unwrap_or_default();
    let map = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (left, right)| {
            let header_value = if right.is_sensitive() {
                Value::String(REDACTED.to_string())
            } else if let Ok(x) = right.to_str() {
                Value::String(x.to_string())
            } else {
                return acc;
            };
            acc.insert(left.as_str().to_string(), header_value);
            acc
        });
    current_span.record(
        "response_headers",
        tracing::field::display(Value::Object(map)),
    );

    // Response bodies carry no card or token data, only references and codes
    if let Ok(response) = serde_json::from_slice::<Value>(&body.response) {
        current_span.record("response_body", tracing::field::display(response));
    }
}

pub async fn call_connector_api(
    clients: &HttpClients,
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = clients.get(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let mut request_builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => {
            let client = client.post(url);
            match request.body {
                Some(RequestContent::Json(payload)) => client.json(&payload),
                None => client,
            }
        }
    }
    .add_headers(headers);

    if let Some(timeout) = request.timeout {
        request_builder = request_builder.timeout(Duration::from_secs(timeout));
    }

    let response = request_builder.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!("Unable to send request to connector."),
        );
        report!(api_error)
    })?;

    handle_response(response).await
}

/// Outbound clients of one authorisation client, built on first use
#[derive(Debug, Default)]
pub struct HttpClients {
    non_proxied: OnceCell<Client>,
    proxied: OnceCell<Client>,
}

impl HttpClients {
    pub fn get(
        &self,
        proxy_config: &Proxy,
        should_bypass_proxy: bool,
    ) -> CustomResult<Client, ApiClientError> {
        Ok(if should_bypass_proxy
            || (proxy_config.http_url.is_none() && proxy_config.https_url.is_none())
        {
            &self.non_proxied
        } else {
            &self.proxied
        }
        .get_or_try_init(|| {
            get_client_builder(proxy_config, should_bypass_proxy)?
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)
                .inspect_err(|err| {
                    info_log(
                        "ERROR",
                        &json!(format!("Failed to construct base client. Error: {:?}", err)),
                    );
                })
        })?
        .clone())
    }
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=299 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let bytes = resp.bytes().await.map_err(|error| {
                report!(error).change_context(ApiClientError::ResponseDecodingFailed)
            })?;

            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let is_masked = matches!(header_value, hyperswitch_masking::Maskable::Masked(_));
                let mut header_value = HeaderValue::from_str(&header_value.into_inner())
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_value.set_sensitive(is_masked);
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Tag {
    /// API: incoming web request.
    ApiIncomingRequest,
    /// End Request
    EndRequest,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}
