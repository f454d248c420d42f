pub mod test;
pub mod transformers;

use base64::Engine;
use common_utils::{
    ext_traits::ByteSliceExt,
    request::{RequestContent, Response},
    CustomResult,
};
use domain_types::{
    connector_types::{AuthorizationOutcome, SecondPhaseAuthorizationRequest},
    errors,
    router_data::{ConnectorAuthType, ErrorResponse},
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::{raw_error_response, ConnectorCommon},
    connector_integration::ConnectorIntegration,
};

use transformers as adyen;

pub(crate) mod headers {
    pub(crate) const AUTHORIZATION: &str = "Authorization";
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const X_API_KEY: &str = "X-Api-Key";
}

pub(crate) const BASE64_ENGINE: base64::engine::GeneralPurpose =
    base64::engine::general_purpose::STANDARD;

/// Classic payment API operation completing a 3D Secure authentication
const AUTHORISE_3D: &str = "authorise3d";

#[derive(Clone)]
pub struct Adyen;

impl Adyen {
    pub const fn new() -> &'static Self {
        &Self
    }
}

impl ConnectorCommon for Adyen {
    fn id(&self) -> &'static str {
        "adyen"
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = adyen::AdyenAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(match auth {
            adyen::AdyenAuthType::Basic { username, password } => {
                let credentials = format!("{}:{}", username.peek(), password.peek());
                vec![(
                    headers::AUTHORIZATION.to_string(),
                    format!("Basic {}", BASE64_ENGINE.encode(credentials)).into_masked(),
                )]
            }
            adyen::AdyenAuthType::ApiKey { api_key } => {
                vec![(headers::X_API_KEY.to_string(), api_key.into_masked())]
            }
        })
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.adyen.base_url.as_ref()
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: adyen::AdyenErrorResponse = res
            .response
            .parse_struct("AdyenErrorResponse")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::info!(connector_response=?response);

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response.error_code,
            message: response.message.to_owned(),
            reason: Some(response.message),
            connector_transaction_id: response.psp_reference,
        })
    }
}

impl ConnectorIntegration for Adyen {
    fn get_headers(
        &self,
        _req: &SecondPhaseAuthorizationRequest,
        connectors: &Connectors,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let mut header = vec![(
            headers::CONTENT_TYPE.to_string(),
            self.get_content_type().to_string().into(),
        )];
        let mut auth_header = self.get_auth_header(&connectors.adyen.auth)?;
        header.append(&mut auth_header);
        Ok(header)
    }

    fn get_url(
        &self,
        _req: &SecondPhaseAuthorizationRequest,
        connectors: &Connectors,
    ) -> CustomResult<String, errors::ConnectorError> {
        Ok(format!(
            "{}/{AUTHORISE_3D}",
            self.base_url(connectors).trim_end_matches('/')
        ))
    }

    fn get_request_body(
        &self,
        req: &SecondPhaseAuthorizationRequest,
    ) -> CustomResult<RequestContent, errors::ConnectorError> {
        let connector_req = adyen::AdyenPaymentRequest3d::from(req);
        Ok(RequestContent::Json(Box::new(connector_req)))
    }

    fn get_request_timeout(&self, connectors: &Connectors) -> Option<u64> {
        Some(connectors.adyen.request_timeout_secs)
    }

    fn handle_response(
        &self,
        res: Response,
    ) -> CustomResult<AuthorizationOutcome, errors::ConnectorError> {
        let response: adyen::AdyenPaymentResult = res
            .response
            .parse_struct("AdyenPaymentResult")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::info!(connector_response=?response);

        Ok(AuthorizationOutcome::from(response))
    }

    fn get_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let fallback = raw_error_response(&res);
        Ok(self.build_error_response(res).unwrap_or_else(|error| {
            tracing::warn!(?error, "undeclared fault body from adyen, using raw body");
            fallback
        }))
    }

    fn get_5xx_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        self.build_error_response(res)
    }
}
