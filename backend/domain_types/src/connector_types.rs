use common_enums::ResultCode;
use common_utils::ext_traits::OptionExt;
use hyperswitch_masking::Secret;

/// Opaque values returned by the card issuer after shopper authentication.
///
/// Neither value is decoded or validated here; absence is forwarded as an empty string.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CorrelationTokens {
    pub md: String,
    pub pa_response: Secret<String>,
}

/// Browser data taken from the request that carried the shopper back from the issuer
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct BrowserContext {
    pub user_agent: String,
    pub accept_header: String,
}

/// Second-phase authorisation request for a 3D Secure payment.
///
/// Built once per redirect and handed by value to the client that submits it.
#[derive(Debug)]
pub struct SecondPhaseAuthorizationRequest {
    merchant_account: String,
    correlation_tokens: CorrelationTokens,
    browser_context: BrowserContext,
    shopper_ip: Secret<String>,
}

impl SecondPhaseAuthorizationRequest {
    pub fn new(
        merchant_account: String,
        correlation_tokens: CorrelationTokens,
        browser_context: BrowserContext,
        shopper_ip: Secret<String>,
    ) -> Self {
        Self {
            merchant_account,
            correlation_tokens,
            browser_context,
            shopper_ip,
        }
    }

    pub fn merchant_account(&self) -> &str {
        &self.merchant_account
    }

    pub fn correlation_tokens(&self) -> &CorrelationTokens {
        &self.correlation_tokens
    }

    pub fn browser_context(&self) -> &BrowserContext {
        &self.browser_context
    }

    pub fn shopper_ip(&self) -> &Secret<String> {
        &self.shopper_ip
    }
}

/// Structured result of a completed authorisation call.
///
/// `auth_code` is only ever present for [`ResultCode::Authorised`] and `refusal_reason`
/// only for [`ResultCode::Refused`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorizationOutcome {
    psp_reference: String,
    result_code: ResultCode,
    auth_code: Option<String>,
    refusal_reason: Option<String>,
}

impl AuthorizationOutcome {
    pub fn new(
        psp_reference: String,
        result_code: ResultCode,
        auth_code: Option<String>,
        refusal_reason: Option<String>,
    ) -> Self {
        let auth_code = auth_code.filter_empty().filter(|_| {
            result_code.is_authorised() || {
                tracing::debug!(
                    %result_code,
                    "dropping authCode sent with a non-authorised result"
                );
                false
            }
        });
        let refusal_reason = refusal_reason.filter_empty().filter(|_| {
            result_code.is_refused() || {
                tracing::debug!(
                    %result_code,
                    "dropping refusalReason sent with a non-refused result"
                );
                false
            }
        });

        Self {
            psp_reference,
            result_code,
            auth_code,
            refusal_reason,
        }
    }

    pub fn psp_reference(&self) -> &str {
        &self.psp_reference
    }

    pub fn result_code(&self) -> &ResultCode {
        &self.result_code
    }

    pub fn auth_code(&self) -> Option<&str> {
        self.auth_code.as_deref()
    }

    pub fn refusal_reason(&self) -> Option<&str> {
        self.refusal_reason.as_deref()
    }

    /// Plain-text report of the four outcome fields
    pub fn report(&self) -> String {
        format!(
            "Payment Result:\n- pspReference: {}\n- resultCode: {}\n- authCode: {}\n- refusalReason: {}\n",
            self.psp_reference,
            self.result_code,
            self.auth_code().unwrap_or_default(),
            self.refusal_reason().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn authorised_outcome_keeps_auth_code_only() {
        let outcome = AuthorizationOutcome::new(
            "PSP001".to_string(),
            ResultCode::Authorised,
            Some("AUTH1".to_string()),
            Some(String::new()),
        );

        assert_eq!(outcome.auth_code(), Some("AUTH1"));
        assert_eq!(outcome.refusal_reason(), None);
        assert_eq!(
            outcome.report(),
            "Payment Result:\n- pspReference: PSP001\n- resultCode: Authorised\n- authCode: AUTH1\n- refusalReason: \n"
        );
    }

    #[test]
    fn refused_outcome_never_carries_auth_code() {
        let outcome = AuthorizationOutcome::new(
            "PSP002".to_string(),
            ResultCode::Refused,
            Some("AUTH9".to_string()),
            Some("CVC Declined".to_string()),
        );

        assert_eq!(outcome.auth_code(), None);
        assert_eq!(outcome.refusal_reason(), Some("CVC Declined"));
    }

    #[test]
    fn other_result_codes_carry_neither_conditional_field() {
        for result_code in [
            ResultCode::Error,
            ResultCode::Received,
            ResultCode::Other("Cancelled".to_string()),
        ] {
            let outcome = AuthorizationOutcome::new(
                "PSP003".to_string(),
                result_code,
                Some("AUTH1".to_string()),
                Some("Not enough balance".to_string()),
            );
            assert_eq!(outcome.auth_code(), None);
            assert_eq!(outcome.refusal_reason(), None);
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dropped_remote_fields_are_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let outcome = tracing::subscriber::with_default(subscriber, || {
            AuthorizationOutcome::new(
                "PSP004".to_string(),
                ResultCode::Refused,
                Some("AUTH9".to_string()),
                Some("CVC Declined".to_string()),
            )
        });

        assert_eq!(outcome.auth_code(), None);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("dropping authCode sent with a non-authorised result"));
        assert!(output.contains("result_code=Refused"));
        assert!(!output.contains("refusalReason"));
    }
}
