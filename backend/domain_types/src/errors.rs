use crate::router_data::ErrorResponse;

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Server responded with unexpected response")]
    UnexpectedServerResponse,
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConnectorError {
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
}

/// Failure of a single authorisation call, as seen by the caller
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum AuthorizationError {
    /// The payment service processed the call and explicitly rejected it
    #[error("Payment service rejected the request: {message}")]
    RemoteServiceError {
        status_code: u16,
        error_code: String,
        message: String,
        psp_reference: Option<String>,
    },
    /// The call did not complete; whether the payment service acted on it is unknown
    #[error("Payment service call did not complete")]
    TransportError,
    /// The call could not be assembled locally and was never sent
    #[error("Payment service request could not be built")]
    RequestNotBuilt,
}

impl AuthorizationError {
    /// Whether the payment service may or may not have applied the call
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::TransportError)
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::RemoteServiceError { .. } => "remote_service_error",
            Self::TransportError => "transport_error",
            Self::RequestNotBuilt => "request_not_built",
        }
    }
}

impl From<ErrorResponse> for AuthorizationError {
    fn from(error: ErrorResponse) -> Self {
        Self::RemoteServiceError {
            status_code: error.status_code,
            error_code: error.code,
            message: error.message,
            psp_reference: error.connector_transaction_id,
        }
    }
}

/// Failure to assemble a completion request from the inbound redirect
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum BuildError {
    #[error("Inbound request body is not valid form data")]
    InvalidFormBody,
    #[error("Shopper IP address could not be determined")]
    ShopperIpUnavailable,
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConfigValidationError {
    #[error("Missing configuration field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
