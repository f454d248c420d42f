use std::net::IpAddr;

use crate::{errors::ConfigValidationError, router_data::ConnectorAuthType};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Connectors {
    pub adyen: ConnectorParams,
}

impl Connectors {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.adyen.validate("adyen")
    }
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
    /// Deadline for a single call, after which its outcome is treated as unknown
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auth: ConnectorAuthType,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ConnectorParams {
    pub fn validate(&self, connector: &'static str) -> Result<(), ConfigValidationError> {
        url::Url::parse(&self.base_url).map_err(|error| ConfigValidationError::InvalidValue {
            field: "base_url",
            reason: format!("{connector}: {error}"),
        })?;

        if self.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "request_timeout_secs",
                reason: format!("{connector}: must be greater than zero"),
            });
        }

        self.auth
            .validate()
            .map_err(|error| ConfigValidationError::InvalidValue {
                field: "auth",
                reason: format!("{connector}: {error}"),
            })
    }
}

#[derive(Debug, Default, serde::Deserialize, Clone)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

/// Per-deployment merchant settings applied to every completion request
#[derive(Clone, serde::Deserialize, Debug)]
pub struct MerchantConfig {
    pub merchant_account: String,
    #[serde(default)]
    pub shopper_ip: ShopperIpSource,
}

impl MerchantConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.merchant_account.trim().is_empty() {
            return Err(ConfigValidationError::MissingField("merchant_account"));
        }
        self.shopper_ip.validate()
    }
}

/// Where the shopper's IP address is taken from when building a completion request
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ShopperIpSource {
    /// A fixed address from configuration
    Static { value: String },
    /// The peer address of the inbound connection
    #[default]
    ClientAddress,
    /// The first entry of a header set by a trusted proxy, falling back to the peer address
    ForwardedHeader { header: String },
}

impl ShopperIpSource {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self {
            Self::Static { value } => value.parse::<IpAddr>().map(|_| ()).map_err(|error| {
                ConfigValidationError::InvalidValue {
                    field: "shopper_ip.value",
                    reason: error.to_string(),
                }
            }),
            Self::ClientAddress => Ok(()),
            Self::ForwardedHeader { header } if header.trim().is_empty() => {
                Err(ConfigValidationError::MissingField("shopper_ip.header"))
            }
            Self::ForwardedHeader { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hyperswitch_masking::Secret;

    fn basic_auth(username: &str, password: &str) -> ConnectorAuthType {
        ConnectorAuthType::BasicAuth {
            username: Secret::new(username.to_string()),
            password: Secret::new(password.to_string()),
        }
    }

    fn params(base_url: &str) -> ConnectorParams {
        ConnectorParams {
            base_url: base_url.to_string(),
            request_timeout_secs: 30,
            auth: basic_auth("ws@Company.TestMerchant", "secret"),
        }
    }

    #[test]
    fn connector_base_url_must_be_a_url() {
        assert!(params("https://pal-test.adyen.com/pal/servlet/Payment/v68/")
            .validate("adyen")
            .is_ok());
        assert!(matches!(
            params("not a url").validate("adyen"),
            Err(ConfigValidationError::InvalidValue { field: "base_url", .. })
        ));
    }

    #[test]
    fn connector_credentials_must_be_present() {
        let with_auth = |auth| ConnectorParams {
            auth,
            ..params("https://pal-test.adyen.com/pal/servlet/Payment/v68/")
        };
        let rejected = [
            ConnectorAuthType::NoKey,
            basic_auth("", ""),
            basic_auth("ws@Company.TestMerchant", " "),
            ConnectorAuthType::HeaderKey {
                api_key: Secret::new(String::new()),
            },
        ];

        for auth in rejected {
            assert!(matches!(
                with_auth(auth).validate("adyen"),
                Err(ConfigValidationError::InvalidValue { field: "auth", .. })
            ));
        }

        let api_key = ConnectorAuthType::HeaderKey {
            api_key: Secret::new("AQE1hmfxK".to_string()),
        };
        assert!(with_auth(api_key).validate("adyen").is_ok());
    }

    #[test]
    fn static_shopper_ip_must_parse() {
        let source = ShopperIpSource::Static {
            value: "123.123.123.123".to_string(),
        };
        assert!(source.validate().is_ok());

        let source = ShopperIpSource::Static {
            value: "localhost".to_string(),
        };
        assert!(source.validate().is_err());
    }

    #[test]
    fn merchant_account_is_required() {
        let merchant = MerchantConfig {
            merchant_account: " ".to_string(),
            shopper_ip: ShopperIpSource::ClientAddress,
        };
        assert!(matches!(
            merchant.validate(),
            Err(ConfigValidationError::MissingField("merchant_account"))
        ));
    }

    #[test]
    fn shopper_ip_source_is_tagged() {
        let source: ShopperIpSource = serde_json::from_str(
            r#"{"source":"forwarded_header","header":"X-Forwarded-For"}"#,
        )
        .expect("tagged source");
        assert_eq!(
            source,
            ShopperIpSource::ForwardedHeader {
                header: "X-Forwarded-For".to_string()
            }
        );
    }
}
