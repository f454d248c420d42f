use hyperswitch_masking::Maskable;
use serde::{Deserialize, Serialize};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
    /// Per-call deadline in seconds; the call is abandoned once it elapses
    pub timeout: Option<u64>,
}

pub enum RequestContent {
    Json(Box<dyn hyperswitch_masking::ErasedMaskSerialize + Send>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
        })
    }
}

impl RequestContent {
    /// Serialize the body with every secret value masked, for logging
    pub fn masked_json(&self) -> serde_json::Value {
        match self {
            Self::Json(body) => body.masked_serialize().unwrap_or(
                serde_json::json!({ "error": "failed to mask serialize connector request" }),
            ),
        }
    }
}

impl Request {
    /// Headers as a JSON object, masked values replaced by a placeholder
    pub fn masked_headers(&self) -> serde_json::Value {
        let masked_headers =
            self.headers
                .iter()
                .fold(serde_json::Map::new(), |mut acc, (key, value)| {
                    let value = match value {
                        Maskable::Masked(_) => {
                            serde_json::Value::String(crate::consts::REDACTED.to_string())
                        }
                        Maskable::Normal(inner) => serde_json::Value::String(inner.to_owned()),
                    };
                    acc.insert(key.clone(), value);
                    acc
                });
        serde_json::Value::Object(masked_headers)
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
    pub timeout: Option<u64>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw response of an outgoing call
#[derive(Clone, Debug)]
pub struct Response {
    pub headers: Option<reqwest::header::HeaderMap>,
    pub response: bytes::Bytes,
    pub status_code: u16,
}
