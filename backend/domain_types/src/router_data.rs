use hyperswitch_masking::{PeekInterface, Secret};

use crate::errors::ConfigValidationError;

/// Credentials attached to every call made to a payment service
#[derive(Default, Debug, Clone, serde::Deserialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    /// HTTP basic authentication with a web service user
    BasicAuth {
        username: Secret<String>,
        password: Secret<String>,
    },
    HeaderKey {
        api_key: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let blank = |value: &Secret<String>| value.peek().trim().is_empty();
        match self {
            Self::BasicAuth { username, .. } if blank(username) => {
                Err(ConfigValidationError::MissingField("auth.username"))
            }
            Self::BasicAuth { password, .. } if blank(password) => {
                Err(ConfigValidationError::MissingField("auth.password"))
            }
            Self::HeaderKey { api_key } if blank(api_key) => {
                Err(ConfigValidationError::MissingField("auth.api_key"))
            }
            Self::BasicAuth { .. } | Self::HeaderKey { .. } => Ok(()),
            Self::NoKey => Err(ConfigValidationError::MissingField("auth")),
        }
    }
}

/// A fault declared by the payment service
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub connector_transaction_id: Option<String>,
}
