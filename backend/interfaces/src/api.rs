use common_utils::{
    consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE},
    request::Response,
    CustomResult,
};
use domain_types::{
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    types::Connectors,
};

pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, hyperswitch_masking::Maskable<String>)>, ConnectorError> {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    /// common error response for a connector if it is same in all case
    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        Ok(raw_error_response(&res))
    }
}

/// Error response carrying the raw body text, for faults without a decodable schema
pub fn raw_error_response(res: &Response) -> ErrorResponse {
    let body = String::from_utf8_lossy(&res.response).trim().to_string();
    ErrorResponse {
        status_code: res.status_code,
        code: NO_ERROR_CODE.to_string(),
        message: if body.is_empty() {
            NO_ERROR_MESSAGE.to_string()
        } else {
            body
        },
        reason: None,
        connector_transaction_id: None,
    }
}
