use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    #[default]
    Form,
    Json,
}

impl std::str::FromStr for BodyEncoding {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "form" | "urlencoded" | "form-urlencoded" => Ok(Self::Form),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown body encoding '{other}'")),
        }
    }
}

/// A flat key/value payload plus the wire encoding to send it with.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub encoding: BodyEncoding,
    pub payload: Value,
}

impl RequestBody {
    pub fn encode<T: Serialize>(
        encoding: BodyEncoding,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            encoding,
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn json<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        Self::encode(BodyEncoding::Json, payload)
    }
}

/// Performs one request and hands back the parsed JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &Url, body: RequestBody) -> Result<Value, TransportError>;

    /// Bodiless GET. A 2xx reply that is not JSON, such as the page a
    /// redirect lands on, yields `None`.
    async fn get(&self, url: &Url) -> Result<Option<Value>, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &Url, body: RequestBody) -> Result<Value, TransportError> {
        let request = self.http.post(url.clone());
        let request = match body.encoding {
            BodyEncoding::Form => request.form(&body.payload),
            BodyEncoding::Json => request.json(&body.payload),
        };

        let response = checked(url, request.send().await)?;
        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::MalformedBody {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn get(&self, url: &Url) -> Result<Option<Value>, TransportError> {
        let response = checked(url, self.http.get(url.clone()).send().await)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::MalformedBody {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(serde_json::from_slice(&bytes).ok())
    }
}

fn checked(
    url: &Url,
    sent: reqwest::Result<reqwest::Response>,
) -> Result<reqwest::Response, TransportError> {
    let response = sent.map_err(|e| TransportError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    debug!(url = %url, status = status.as_u16(), "submission response received");
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
