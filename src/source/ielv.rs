use crate::models::Villa;
use crate::source::traits::PropertySource;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// IELV XML feed client
pub struct IelvClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl IelvClient {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ielv-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create IELV HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        })
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("IELV GET {}", url);
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header(reqwest::header::AUTHORIZATION, key),
            None => request,
        }
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let response = self
            .request(path)
            .send()
            .await
            .with_context(|| format!("Failed to fetch IELV {}", path))?;

        if !response.status().is_success() {
            bail!("IELV returned status {} for {}", response.status(), path);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read IELV response for {}", path))
    }
}

#[async_trait]
impl PropertySource for IelvClient {
    async fn list_ids(&self) -> Result<Vec<String>> {
        let body = self.fetch("/villas.xml").await?;
        let ids = Villa::ids_from_listing(&body).context("Invalid IELV villa listing")?;
        info!("Found {} villas in the IELV feed", ids.len());
        Ok(ids)
    }

    async fn villa(&self, id: &str) -> Result<Villa> {
        let body = self.fetch(&format!("/villas.xml/{}", id)).await?;
        Villa::from_document(&body).with_context(|| format!("Invalid IELV document for villa {}", id))
    }

    fn source_name(&self) -> &'static str {
        "IELV"
    }
}
