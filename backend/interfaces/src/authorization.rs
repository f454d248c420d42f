use common_utils::CustomResult;
use domain_types::{
    connector_types::{AuthorizationOutcome, SecondPhaseAuthorizationRequest},
    errors::AuthorizationError,
};

/// Submits a completion request to the payment service.
///
/// Implementations make exactly one remote call per invocation and never resubmit it,
/// whatever the outcome.
#[async_trait::async_trait]
pub trait AuthorizationClient: Send + Sync {
    async fn authorize_3d(
        &self,
        request: SecondPhaseAuthorizationRequest,
    ) -> CustomResult<AuthorizationOutcome, AuthorizationError>;
}
