use crate::error::ApiError;
use crate::myvr::traits::MyVrApi;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// reqwest-backed MyVR client
pub struct MyVrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MyVrClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ielv-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create MyVR HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("MyVR {} {}", method, url);
        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json(&self, path: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = self.send(path, request).await?;
        let text = response.text().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        // Mutations may answer with an empty body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MyVrApi for MyVrClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send_json(path, self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send_json(path, self.request(Method::POST, path).json(&body))
            .await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send_json(path, self.request(Method::PUT, path).json(&body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
