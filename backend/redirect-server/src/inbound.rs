//! HTTP view of the issuer redirect.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use domain_types::{errors::BuildError, redirect::InboundRequest};
use error_stack::ResultExt;
use http::{header, HeaderMap};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parameters, headers and peer address of an inbound redirect.
///
/// Parameters resolve from the query string first, then from a form-encoded body. The first
/// occurrence of a repeated name wins.
#[derive(Debug)]
pub struct HttpInboundRequest {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    headers: HeaderMap,
    peer: Option<IpAddr>,
}

impl HttpInboundRequest {
    /// Read the request head and its already collected body
    pub fn from_parts(
        parts: &http::request::Parts,
        body: &[u8],
    ) -> error_stack::Result<Self, BuildError> {
        let query = parts
            .uri
            .query()
            .map(serde_urlencoded::from_str::<Vec<(String, String)>>)
            .transpose()
            .change_context(BuildError::InvalidFormBody)
            .attach_printable("query string is not url encoded")?
            .unwrap_or_default();

        let form = if is_form(&parts.headers) {
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
                .change_context(BuildError::InvalidFormBody)?
        } else {
            Vec::new()
        };

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| address.ip());

        Ok(Self {
            query,
            form,
            headers: parts.headers.clone(),
            peer,
        })
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

impl InboundRequest for HttpInboundRequest {
    fn param(&self, name: &str) -> Option<&str> {
        first(&self.query, name).or_else(|| first(&self.form, name))
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn peer_addr(&self) -> Option<IpAddr> {
        self.peer
    }
}
