use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use domain_types::{errors::BuildError, redirect::RedirectRequestBuilder};
use error_stack::ResultExt;
use external_services::service::{info_log, Tag};
use interfaces::authorization::AuthorizationClient;
use serde_json::json;

use crate::{configs, error::CallbackError, inbound::HttpInboundRequest};

/// Completes 3D Secure authorisations for shoppers returning from the issuer
#[derive(Clone)]
pub struct Payments {
    pub config: Arc<configs::Config>,
    pub authorization_client: Arc<dyn AuthorizationClient>,
}

impl Payments {
    /// Build the completion request from the redirect and submit it once.
    ///
    /// Returns the plain-text outcome report on success.
    pub async fn authorise_3d(&self, request: Request) -> Result<String, CallbackError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, self.config.server.max_body_bytes)
            .await
            .change_context(BuildError::InvalidFormBody)
            .attach_printable("unable to read the redirect body")?;

        let inbound = HttpInboundRequest::from_parts(&parts, &body)?;
        let completion_request = RedirectRequestBuilder::build(&inbound, &self.config.merchant)?;

        tracing::info!(
            tag = ?Tag::ApiIncomingRequest,
            md = %completion_request.correlation_tokens().md,
            "submitting 3d secure completion"
        );

        let outcome = self
            .authorization_client
            .authorize_3d(completion_request)
            .await?;

        info_log(
            "AUTHORISE_3D_OUTCOME",
            &json!({
                "psp_reference": outcome.psp_reference(),
                "result_code": outcome.result_code().as_str(),
            }),
        );

        Ok(outcome.report())
    }
}

pub async fn authorise_3d_callback(
    State(payments): State<Payments>,
    request: Request,
) -> Response {
    let response = match payments.authorise_3d(request).await {
        Ok(report) => report.into_response(),
        Err(error) => error.into_response(),
    };
    tracing::info!(tag = ?Tag::EndRequest, status = %response.status(), "redirect handled");
    response
}
