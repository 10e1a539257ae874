use std::time::Duration;

use serde::Deserialize;

use crate::predict::{FetchError, Observer, Pass, PassSource};

pub const DEFAULT_URL: &str = "http://api.open-notify.org/iss-pass.json";

const SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct PassResponse {
    message: Option<String>,
    response: Option<serde_json::Value>,
}

/// Client for the Open Notify ISS pass prediction API
pub struct OpenNotifyClient {
    url: String,
    http: reqwest::Client,
}

impl OpenNotifyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PassSource for OpenNotifyClient {
    async fn fetch_passes(&self, observer: &Observer, count: u32) -> Result<Vec<Pass>, FetchError> {
        let body = self
            .http
            .get(&self.url)
            .query(&[
                ("lat", observer.latitude.to_string()),
                ("lon", observer.longitude.to_string()),
                ("alt", observer.altitude_m.to_string()),
                ("n", count.to_string()),
            ])
            .send()
            .await?
            .text()
            .await?;

        let passes = parse_response(&body)?;
        log::debug!("Fetched {} passes from {}", passes.len(), self.url);
        Ok(passes)
    }
}

/// Extract passes from a response body. A well-formed response that does not
/// report success carries no passes.
pub fn parse_response(body: &str) -> Result<Vec<Pass>, FetchError> {
    let parsed: PassResponse = serde_json::from_str(body)?;

    if parsed.message.as_deref() != Some(SUCCESS) {
        log::debug!(
            "Prediction service reported {:?}, treating as no passes",
            parsed.message
        );
        return Ok(Vec::new());
    }

    let response = parsed
        .response
        .ok_or_else(|| FetchError::Protocol("missing 'response'".into()))?;
    Ok(serde_json::from_value(response)?)
}
