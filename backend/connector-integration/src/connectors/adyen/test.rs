#[cfg(test)]
mod tests {
    pub mod authorise_3d {
        use common_enums::ResultCode;
        use common_utils::request::{Method, RequestContent, Response};
        use domain_types::{
            connector_types::{BrowserContext, CorrelationTokens, SecondPhaseAuthorizationRequest},
            errors::ConnectorError,
            router_data::ConnectorAuthType,
            types::{ConnectorParams, Connectors},
        };
        use hyperswitch_masking::Secret;
        use interfaces::connector_integration::ConnectorIntegration;
        use serde_json::json;

        use crate::connectors::Adyen;

        fn connectors(auth: ConnectorAuthType) -> Connectors {
            Connectors {
                adyen: ConnectorParams {
                    base_url: "https://pal-test.adyen.com/pal/servlet/Payment/v68/".to_string(),
                    request_timeout_secs: 15,
                    auth,
                },
            }
        }

        fn basic_auth() -> ConnectorAuthType {
            ConnectorAuthType::BasicAuth {
                username: Secret::new("ws@Company.Test".to_string()), // Hardcoded dummy value
                password: Secret::new("test_password".to_string()), // Hardcoded dummy value
            }
        }

        fn request() -> SecondPhaseAuthorizationRequest {
            SecondPhaseAuthorizationRequest::new(
                "TestMerchant".to_string(),
                CorrelationTokens {
                    md: "abc123".to_string(),
                    pa_response: Secret::new("xyz789".to_string()),
                },
                BrowserContext {
                    user_agent: "TestAgent/1.0".to_string(),
                    accept_header: "text/html".to_string(),
                },
                Secret::new("203.0.113.7".to_string()),
            )
        }

        fn response(status_code: u16, body: serde_json::Value) -> Response {
            Response {
                headers: None,
                response: bytes::Bytes::from(body.to_string()),
                status_code,
            }
        }

        #[test]
        fn test_build_request_valid() {
            let connector = Adyen::new();
            let request = connector
                .build_request(&request(), &connectors(basic_auth()))
                .expect("request builds");

            assert_eq!(request.method, Method::Post);
            assert_eq!(
                request.url,
                "https://pal-test.adyen.com/pal/servlet/Payment/v68/authorise3d"
            );
            assert_eq!(request.timeout, Some(15));

            let headers = request.masked_headers();
            assert_eq!(headers["Content-Type"], "application/json");
            assert_eq!(headers["Authorization"], common_utils::consts::REDACTED);

            let authorization = request
                .headers
                .iter()
                .find(|(name, _)| name == "Authorization")
                .map(|(_, value)| value.clone().into_inner());
            assert_eq!(
                authorization.as_deref(),
                Some("Basic d3NAQ29tcGFueS5UZXN0OnRlc3RfcGFzc3dvcmQ=")
            );

            let Some(RequestContent::Json(body)) = request.body else {
                panic!("json body expected");
            };
            let body = serde_json::to_value(&body).expect("body serializes");
            assert_eq!(
                body,
                json!({
                    "merchantAccount": "TestMerchant",
                    "md": "abc123",
                    "paResponse": "xyz789",
                    "shopperIP": "203.0.113.7",
                    "browserInfo": {
                        "userAgent": "TestAgent/1.0",
                        "acceptHeader": "text/html",
                    },
                })
            );
        }

        #[test]
        fn test_build_request_masks_tokens_in_logs() {
            let request = Adyen::new()
                .build_request(&request(), &connectors(basic_auth()))
                .expect("request builds");

            let masked = request
                .body
                .as_ref()
                .map(RequestContent::masked_json)
                .expect("body is set");
            assert_eq!(masked["md"], "abc123");
            assert_ne!(masked["paResponse"], "xyz789");
            assert_ne!(masked["shopperIP"], "203.0.113.7");
        }

        #[test]
        fn test_build_request_with_api_key() {
            let auth = ConnectorAuthType::HeaderKey {
                api_key: Secret::new("test_adyen_api_key".to_string()), // Hardcoded dummy value
            };
            let request = Adyen::new()
                .build_request(&request(), &connectors(auth))
                .expect("request builds");

            let api_key = request
                .headers
                .iter()
                .find(|(name, _)| name == "X-Api-Key")
                .map(|(_, value)| value.clone().into_inner());
            assert_eq!(api_key.as_deref(), Some("test_adyen_api_key"));
        }

        #[test]
        fn test_build_request_without_credentials() {
            let error = Adyen::new()
                .build_request(&request(), &connectors(ConnectorAuthType::NoKey))
                .unwrap_err();
            assert_eq!(
                error.current_context(),
                &ConnectorError::FailedToObtainAuthType
            );
        }

        #[test]
        fn test_handle_response_authorised() {
            let outcome = Adyen::new()
                .handle_response(response(
                    200,
                    json!({
                        "pspReference": "PSP001",
                        "resultCode": "Authorised",
                        "authCode": "AUTH1",
                        "refusalReason": "",
                        "additionalData": { "liabilityShift": "true" },
                    }),
                ))
                .expect("outcome decodes");

            assert_eq!(outcome.psp_reference(), "PSP001");
            assert_eq!(outcome.result_code(), &ResultCode::Authorised);
            assert_eq!(outcome.auth_code(), Some("AUTH1"));
            assert_eq!(outcome.refusal_reason(), None);
        }

        #[test]
        fn test_handle_response_refused() {
            let outcome = Adyen::new()
                .handle_response(response(
                    200,
                    json!({
                        "pspReference": "PSP002",
                        "resultCode": "Refused",
                        "refusalReason": "3D Not Authenticated",
                    }),
                ))
                .expect("outcome decodes");

            assert_eq!(outcome.result_code(), &ResultCode::Refused);
            assert_eq!(outcome.auth_code(), None);
            assert_eq!(outcome.refusal_reason(), Some("3D Not Authenticated"));
        }

        #[test]
        fn test_handle_response_without_result_code() {
            let error = Adyen::new()
                .handle_response(response(200, json!({ "pspReference": "PSP003" })))
                .unwrap_err();
            assert_eq!(
                error.current_context(),
                &ConnectorError::ResponseDeserializationFailed
            );
        }

        #[test]
        fn test_error_response_declared_fault() {
            let error = Adyen::new()
                .get_error_response(response(
                    422,
                    json!({
                        "status": 422,
                        "errorCode": "11_002",
                        "message": "Invalid PaRes from issuer",
                        "errorType": "validation",
                        "pspReference": "PSP004",
                    }),
                ))
                .expect("declared fault decodes");

            assert_eq!(error.status_code, 422);
            assert_eq!(error.code, "11_002");
            assert_eq!(error.message, "Invalid PaRes from issuer");
            assert_eq!(error.connector_transaction_id.as_deref(), Some("PSP004"));
        }

        #[test]
        fn test_error_response_undeclared_4xx_body() {
            let res = Response {
                headers: None,
                response: bytes::Bytes::from_static(b"HTTP Status 401 - Unauthorized"),
                status_code: 401,
            };
            let error = Adyen::new()
                .get_error_response(res)
                .expect("4xx always maps to a fault");

            assert_eq!(error.status_code, 401);
            assert_eq!(error.message, "HTTP Status 401 - Unauthorized");
        }

        #[test]
        fn test_error_response_undeclared_5xx_body() {
            let res = Response {
                headers: None,
                response: bytes::Bytes::from_static(b"<html>Bad Gateway</html>"),
                status_code: 502,
            };
            let error = Adyen::new().get_5xx_error_response(res).unwrap_err();
            assert_eq!(
                error.current_context(),
                &ConnectorError::ResponseDeserializationFailed
            );
        }
    }
}
