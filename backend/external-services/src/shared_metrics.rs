use error_stack::ResultExt;
use http_body::Body as HttpBody;
use lazy_static::lazy_static;
use prometheus::{
    self, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
// Define latency buckets for histograms
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const UNMATCHED_ROUTE: &str = "unmatched";

lazy_static! {
    pub static ref HTTP_SERVER_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "HTTP_SERVER_REQUESTS_TOTAL",
        "Total number of HTTP requests received",
        &["method", "route"]
    )
    .unwrap();
    pub static ref HTTP_SERVER_REQUESTS_SUCCESSFUL: IntCounterVec = register_int_counter_vec!(
        "HTTP_SERVER_REQUESTS_SUCCESSFUL",
        "Total number of HTTP requests successful",
        &["method", "route"]
    )
    .unwrap();
    pub static ref HTTP_SERVER_REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        "HTTP_SERVER_REQUEST_LATENCY",
        "Request latency in seconds",
        &["method", "route"],
        LATENCY_BUCKETS.to_vec()
    )
    .unwrap();
    pub static ref EXTERNAL_SERVICE_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS",
        "Latency of external service API calls",
        &["method", "service", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .unwrap();
    pub static ref EXTERNAL_SERVICE_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_TOTAL_API_CALLS",
        "Total number of external service API calls",
        &["method", "service", "connector"]
    )
    .unwrap();
    pub static ref EXTERNAL_SERVICE_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_API_CALLS_ERRORS",
        "Total number of errors in external service API calls",
        &["method", "service", "connector", "error"]
    )
    .unwrap();
    pub static ref AUTHORISE_3D_OUTCOMES: IntCounterVec = register_int_counter_vec!(
        "AUTHORISE_3D_OUTCOMES",
        "Completed 3D Secure authorisations by result code",
        &["connector", "result_code"]
    )
    .unwrap();
}

// Middleware Layer recording metrics for every inbound HTTP request
#[derive(Clone)]
pub struct HttpMetricsLayer {
    routes: Arc<[String]>,
}

impl HttpMetricsLayer {
    /// Requests to paths outside `routes` are recorded under a single label
    pub fn new(routes: impl IntoIterator<Item = String>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, service: S) -> Self::Service {
        HttpMetricsService::new(service, Arc::clone(&self.routes))
    }
}

// Middleware Service that intercepts all HTTP calls
#[derive(Clone)]
pub struct HttpMetricsService<S> {
    inner: S,
    routes: Arc<[String]>,
}

impl<S> HttpMetricsService<S> {
    pub fn new(inner: S, routes: Arc<[String]>) -> Self {
        Self { inner, routes }
    }

    fn route_label<B>(&self, req: &http::Request<B>) -> String {
        let path = req.uri().path();
        self.routes
            .iter()
            .find(|route| route.as_str() == path)
            .cloned()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
    }
}

impl<S, B, ResBody> Service<http::Request<B>> for HttpMetricsService<S>
where
    S: Service<http::Request<B>, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: HttpBody + Send + 'static,
{
    type Response = http::Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let start_time = Instant::now();

        let method = req.method().to_string();
        let route = self.route_label(&req);

        // Increment total requests counter
        HTTP_SERVER_REQUESTS_TOTAL
            .with_label_values(&[&method, &route])
            .inc();

        Box::pin(async move {
            let result = inner.call(req).await;

            if let Ok(response) = &result {
                if response.status().is_success() {
                    HTTP_SERVER_REQUESTS_SUCCESSFUL
                        .with_label_values(&[&method, &route])
                        .inc();
                }
            }

            // Record latency
            let duration = start_time.elapsed().as_secs_f64();
            HTTP_SERVER_REQUEST_LATENCY
                .with_label_values(&[&method, &route])
                .observe(duration);

            result
        })
    }
}

// Metrics handler
pub async fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}
