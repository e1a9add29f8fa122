// AI service HTTP client.
// Handles authentication headers and request/response status mapping.

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, StyloError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the generative image/video API.
pub struct AiClient {
    client: Client,
    base_url: String,
}

impl AiClient {
    /// Create a new client with the given API key.
    pub fn new(key: &str) -> Result<Self> {
        Self::with_base_url(key, API_BASE)
    }

    /// Create a client against a custom base URL (used in tests).
    pub fn with_base_url(key: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(key).map_err(|e| StyloError::Other(e.to_string()))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("stylosphere-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StyloError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("GEMINI_API_KEY").map_err(|_| StyloError::MissingKey)?;
        Self::new(&key)
    }

    /// POST a JSON body to an endpoint under the API base.
    pub async fn post<B: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(StyloError::Api)?;

        check_response(response).await
    }

    /// GET an endpoint under the API base (operation polling).
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).send().await.map_err(StyloError::Api)?;

        check_response(response).await
    }
}

/// Check response status and convert errors. Key problems get their own
/// variant so the UI can prompt for re-selection.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StyloError::InvalidKey),
        StatusCode::TOO_MANY_REQUESTS => Err(StyloError::Other(
            "Quota exceeded, try again later".to_string(),
        )),
        status => Err(StyloError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}
