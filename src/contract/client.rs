use std::time::Duration;

use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::Value;

use super::error::{ContractError, Result};

/// HTTP client for `{base}/device` with the fixed Authorization and Content-Type headers.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

/// Status and raw body of one `/device` round trip. The body is always fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub request: String,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl DeviceClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/device", self.base_url)
    }

    pub async fn post(&self, body: &Value) -> Result<ApiResponse> {
        self.send(self.http.post(self.url()).json(body)).await
    }

    pub async fn get(&self, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.send(self.http.get(self.url()).query(query)).await
    }

    pub async fn delete(&self, body: &Value) -> Result<ApiResponse> {
        self.send(self.http.delete(self.url()).json(body)).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let request = builder.build()?;
        let label = request_label(&request);
        let response = self.http.execute(request).await?;
        ApiResponse::read(label, response).await
    }
}

/// `METHOD /path?query` taken from the URL that actually goes on the wire.
fn request_label(request: &reqwest::Request) -> String {
    let url = request.url();
    match url.query() {
        Some(query) => format!("{} {}?{}", request.method(), url.path(), query),
        None => format!("{} {}", request.method(), url.path()),
    }
}

impl ApiResponse {
    async fn read(request: String, response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(%request, status = status.as_u16(), "received response");
        Ok(Self {
            request,
            status,
            body,
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn expect_status(&self, expected: u16) -> Result<()> {
        if self.status.as_u16() == expected {
            return Ok(());
        }
        Err(ContractError::violation(
            format!("{} status", self.request),
            expected,
            format!("{} ({})", self.status.as_u16(), self.body_text()),
        ))
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|source| ContractError::Decode {
            request: self.request.clone(),
            body: self.body_text(),
            source,
        })
    }

    /// `body[field] == expected` on a JSON object body.
    pub fn expect_field(&self, field: &str, expected: &str) -> Result<()> {
        let json = self.json()?;
        match json.get(field) {
            Some(Value::String(actual)) if actual == expected => Ok(()),
            other => Err(ContractError::violation(
                format!("{} body.{}", self.request, field),
                format!("{:?}", expected),
                other.map_or_else(|| "<missing>".to_string(), Value::to_string),
            )),
        }
    }

    pub fn expect_array(&self) -> Result<Vec<Value>> {
        match self.json()? {
            Value::Array(items) => Ok(items),
            other => Err(ContractError::violation(
                format!("{} body", self.request),
                "a JSON array",
                other,
            )),
        }
    }
}
