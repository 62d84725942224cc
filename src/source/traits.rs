use crate::models::Villa;
use anyhow::Result;
use async_trait::async_trait;

/// Where villa documents come from
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Source ids of every villa in the feed, in feed order
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Full detail document for one villa
    async fn villa(&self, id: &str) -> Result<Villa>;

    fn source_name(&self) -> &'static str;
}
