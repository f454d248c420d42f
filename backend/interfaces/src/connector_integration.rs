use common_utils::{
    request::{Method, Request, RequestBuilder, RequestContent, Response},
    CustomResult,
};
use domain_types::{
    connector_types::{AuthorizationOutcome, SecondPhaseAuthorizationRequest},
    errors::ConnectorError,
    router_data::ErrorResponse,
    types::Connectors,
};
use error_stack::report;
use hyperswitch_masking::Maskable;

use crate::api::ConnectorCommon;

pub type BoxedConnectorIntegration = Box<&'static (dyn ConnectorIntegration + Sync)>;

/// Wire contract of a payment service's 3D Secure completion call
pub trait ConnectorIntegration: ConnectorCommon + Sync {
    fn get_headers(
        &self,
        _req: &SecondPhaseAuthorizationRequest,
        _connectors: &Connectors,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![])
    }

    fn get_content_type(&self) -> &'static str {
        self.common_get_content_type()
    }

    fn get_url(
        &self,
        req: &SecondPhaseAuthorizationRequest,
        connectors: &Connectors,
    ) -> CustomResult<String, ConnectorError>;

    fn get_request_body(
        &self,
        req: &SecondPhaseAuthorizationRequest,
    ) -> CustomResult<RequestContent, ConnectorError>;

    /// Per-call deadline in seconds
    fn get_request_timeout(&self, _connectors: &Connectors) -> Option<u64> {
        None
    }

    fn build_request(
        &self,
        req: &SecondPhaseAuthorizationRequest,
        connectors: &Connectors,
    ) -> CustomResult<Request, ConnectorError> {
        Ok(RequestBuilder::new()
            .method(Method::Post)
            .url(&self.get_url(req, connectors)?)
            .headers(self.get_headers(req, connectors)?)
            .set_body(self.get_request_body(req)?)
            .timeout(self.get_request_timeout(connectors))
            .build())
    }

    /// Map a successful response onto the outcome
    fn handle_response(&self, res: Response) -> CustomResult<AuthorizationOutcome, ConnectorError>;

    /// Decode a declared fault from a 4xx response
    fn get_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        self.build_error_response(res)
    }

    /// Decode a declared fault from a 5xx response.
    ///
    /// An error here means the body is not a fault the service declared, so the outcome of
    /// the call is unknown.
    fn get_5xx_error_response(
        &self,
        _res: Response,
    ) -> CustomResult<ErrorResponse, ConnectorError> {
        Err(report!(ConnectorError::ResponseDeserializationFailed))
    }
}
