//! Assembly of the second-phase authorisation request from the issuer redirect.
//!
//! The issuer sends the shopper back with `MD` and `PaRes`. Both are forwarded verbatim;
//! a missing token becomes an empty value and is left for the payment service to reject.

use std::net::IpAddr;

use common_utils::CustomResult;
use error_stack::report;
use hyperswitch_masking::Secret;

use crate::{
    connector_types::{BrowserContext, CorrelationTokens, SecondPhaseAuthorizationRequest},
    errors::BuildError,
    types::{MerchantConfig, ShopperIpSource},
};

pub const MD_PARAM: &str = "MD";
pub const PA_RES_PARAM: &str = "PaRes";
pub const USER_AGENT_HEADER: &str = "User-Agent";
pub const ACCEPT_HEADER: &str = "Accept";

/// Read access to the inbound redirect request
pub trait InboundRequest {
    /// A named query or form parameter
    fn param(&self, name: &str) -> Option<&str>;

    /// A named header, matched case-insensitively
    fn header(&self, name: &str) -> Option<&str>;

    /// Address of the peer that opened the inbound connection
    fn peer_addr(&self) -> Option<IpAddr>;
}

pub struct RedirectRequestBuilder;

impl RedirectRequestBuilder {
    pub fn build(
        inbound: &impl InboundRequest,
        config: &MerchantConfig,
    ) -> CustomResult<SecondPhaseAuthorizationRequest, BuildError> {
        let correlation_tokens = CorrelationTokens {
            md: read_param(inbound, MD_PARAM),
            pa_response: Secret::new(read_param(inbound, PA_RES_PARAM)),
        };

        let browser_context = BrowserContext {
            user_agent: read_header(inbound, USER_AGENT_HEADER),
            accept_header: read_header(inbound, ACCEPT_HEADER),
        };

        let shopper_ip = resolve_shopper_ip(&config.shopper_ip, inbound)?;

        Ok(SecondPhaseAuthorizationRequest::new(
            config.merchant_account.clone(),
            correlation_tokens,
            browser_context,
            Secret::new(shopper_ip),
        ))
    }
}

fn read_param(inbound: &impl InboundRequest, name: &'static str) -> String {
    inbound
        .param(name)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            tracing::warn!(parameter = name, "redirect parameter missing, forwarding empty value");
            String::new()
        })
}

fn read_header(inbound: &impl InboundRequest, name: &'static str) -> String {
    inbound
        .header(name)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            tracing::debug!(header = name, "browser header missing, forwarding empty value");
            String::new()
        })
}

fn resolve_shopper_ip(
    source: &ShopperIpSource,
    inbound: &impl InboundRequest,
) -> CustomResult<String, BuildError> {
    let peer = || inbound.peer_addr().map(|address| address.to_string());

    let shopper_ip = match source {
        ShopperIpSource::Static { value } => Some(value.clone()),
        ShopperIpSource::ClientAddress => peer(),
        ShopperIpSource::ForwardedHeader { header } => inbound
            .header(header)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .or_else(peer),
    };

    shopper_ip.ok_or_else(|| {
        report!(BuildError::ShopperIpUnavailable)
            .attach_printable(format!("shopper ip source: {source:?}"))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hyperswitch_masking::PeekInterface;

    use super::*;

    #[derive(Default)]
    struct StubInbound {
        params: HashMap<&'static str, &'static str>,
        headers: HashMap<String, &'static str>,
        peer: Option<IpAddr>,
    }

    impl StubInbound {
        fn with_param(mut self, name: &'static str, value: &'static str) -> Self {
            self.params.insert(name, value);
            self
        }

        fn with_header(mut self, name: &str, value: &'static str) -> Self {
            self.headers.insert(name.to_ascii_lowercase(), value);
            self
        }

        fn with_peer(mut self, peer: &str) -> Self {
            self.peer = peer.parse().ok();
            self
        }
    }

    impl InboundRequest for StubInbound {
        fn param(&self, name: &str) -> Option<&str> {
            self.params.get(name).copied()
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(&name.to_ascii_lowercase()).copied()
        }

        fn peer_addr(&self) -> Option<IpAddr> {
            self.peer
        }
    }

    fn merchant(shopper_ip: ShopperIpSource) -> MerchantConfig {
        MerchantConfig {
            merchant_account: "TestMerchant".to_string(),
            shopper_ip,
        }
    }

    #[test]
    fn tokens_and_headers_are_copied_verbatim() {
        let inbound = StubInbound::default()
            .with_param(MD_PARAM, "abc123")
            .with_param(PA_RES_PARAM, "eNpVUttygjAQ%2B%3D=")
            .with_header("user-agent", "TestAgent/1.0")
            .with_header("accept", "text/html")
            .with_peer("10.1.2.3");

        let request =
            RedirectRequestBuilder::build(&inbound, &merchant(ShopperIpSource::ClientAddress))
                .expect("request builds");

        assert_eq!(request.merchant_account(), "TestMerchant");
        assert_eq!(request.correlation_tokens().md, "abc123");
        assert_eq!(
            request.correlation_tokens().pa_response.peek(),
            "eNpVUttygjAQ%2B%3D="
        );
        assert_eq!(request.browser_context().user_agent, "TestAgent/1.0");
        assert_eq!(request.browser_context().accept_header, "text/html");
        assert_eq!(request.shopper_ip().peek(), "10.1.2.3");
    }

    #[test]
    fn missing_values_become_empty_fields() {
        let inbound = StubInbound::default().with_peer("10.1.2.3");

        let request =
            RedirectRequestBuilder::build(&inbound, &merchant(ShopperIpSource::ClientAddress))
                .expect("absence is not a build error");

        assert_eq!(request.correlation_tokens(), &CorrelationTokens::default());
        assert_eq!(request.browser_context(), &BrowserContext::default());
    }

    #[test]
    fn static_shopper_ip_ignores_the_connection() {
        let inbound = StubInbound::default().with_peer("10.1.2.3");
        let source = ShopperIpSource::Static {
            value: "123.123.123.123".to_string(),
        };

        let request =
            RedirectRequestBuilder::build(&inbound, &merchant(source)).expect("request builds");

        assert_eq!(request.shopper_ip().peek(), "123.123.123.123");
    }

    #[test]
    fn forwarded_header_takes_the_first_hop() {
        let source = ShopperIpSource::ForwardedHeader {
            header: "X-Forwarded-For".to_string(),
        };
        let inbound = StubInbound::default()
            .with_header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .with_peer("10.0.0.1");

        let request = RedirectRequestBuilder::build(&inbound, &merchant(source.clone()))
            .expect("request builds");
        assert_eq!(request.shopper_ip().peek(), "203.0.113.7");

        let inbound = StubInbound::default().with_peer("10.0.0.1");
        let request =
            RedirectRequestBuilder::build(&inbound, &merchant(source)).expect("request builds");
        assert_eq!(request.shopper_ip().peek(), "10.0.0.1");
    }

    #[test]
    fn unknown_client_address_is_a_build_error() {
        let inbound = StubInbound::default().with_param(MD_PARAM, "abc123");

        let error =
            RedirectRequestBuilder::build(&inbound, &merchant(ShopperIpSource::ClientAddress))
                .unwrap_err();

        assert_eq!(error.current_context(), &BuildError::ShopperIpUnavailable);
    }
}
