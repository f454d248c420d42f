use common_enums::ResultCode;
use domain_types::{
    connector_types::{AuthorizationOutcome, SecondPhaseAuthorizationRequest},
    errors,
    router_data::ConnectorAuthType,
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

type Error = error_stack::Report<errors::ConnectorError>;

pub enum AdyenAuthType {
    /// Web service user of the merchant company account
    Basic {
        username: Secret<String>,
        password: Secret<String>,
    },
    ApiKey {
        api_key: Secret<String>,
    },
}

impl TryFrom<&ConnectorAuthType> for AdyenAuthType {
    type Error = Error;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BasicAuth { username, password } => Ok(Self::Basic {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
            ConnectorAuthType::HeaderKey { api_key } => Ok(Self::ApiKey {
                api_key: api_key.to_owned(),
            }),
            ConnectorAuthType::NoKey => Err(errors::ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenBrowserInfo {
    user_agent: String,
    accept_header: String,
}

/// Body of the `authorise3d` call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenPaymentRequest3d {
    merchant_account: String,
    md: String,
    pa_response: Secret<String>,
    #[serde(rename = "shopperIP")]
    shopper_ip: Secret<String>,
    browser_info: AdyenBrowserInfo,
}

impl From<&SecondPhaseAuthorizationRequest> for AdyenPaymentRequest3d {
    fn from(item: &SecondPhaseAuthorizationRequest) -> Self {
        let tokens = item.correlation_tokens();
        let browser = item.browser_context();
        Self {
            merchant_account: item.merchant_account().to_string(),
            md: tokens.md.clone(),
            pa_response: tokens.pa_response.clone(),
            shopper_ip: item.shopper_ip().clone(),
            browser_info: AdyenBrowserInfo {
                user_agent: browser.user_agent.clone(),
                accept_header: browser.accept_header.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenPaymentResult {
    #[serde(default)]
    pub psp_reference: String,
    pub result_code: ResultCode,
    pub auth_code: Option<String>,
    pub refusal_reason: Option<String>,
}

impl From<AdyenPaymentResult> for AuthorizationOutcome {
    fn from(item: AdyenPaymentResult) -> Self {
        Self::new(
            item.psp_reference,
            item.result_code,
            item.auth_code,
            item.refusal_reason,
        )
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenErrorResponse {
    pub status: i32,
    pub error_code: String,
    pub message: String,
    pub error_type: String,
    pub psp_reference: Option<String>,
}
