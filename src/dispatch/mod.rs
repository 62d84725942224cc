//! Multi-property work queue. Each continuation carries the keys still to
//! sync; processing one key re-enqueues the rest, so the pending list lives
//! in the message rather than in the worker.

use crate::source::PropertySource;
use crate::sync::Reconciler;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Unit of work applied to each queued property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Upsert plus every child resource
    Property,
    /// Calendar events only
    Availability,
    /// Rates only
    Rates,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Property => "property",
            Stage::Availability => "availability",
            Stage::Rates => "rates",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    pub property_keys: Vec<String>,
    pub stage: Stage,
}

/// Result of handling a single continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Nothing was pending
    Complete,
    Processed { key: String, succeeded: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

pub struct Dispatcher {
    source: Arc<dyn PropertySource>,
    reconciler: Reconciler,
    queue: mpsc::UnboundedSender<Continuation>,
}

impl Dispatcher {
    /// Build a dispatcher and the receiving end of its queue
    pub fn new(
        source: Arc<dyn PropertySource>,
        reconciler: Reconciler,
    ) -> (Self, mpsc::UnboundedReceiver<Continuation>) {
        let (queue, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            source,
            reconciler,
            queue,
        };
        (dispatcher, receiver)
    }

    pub fn enqueue(&self, continuation: Continuation) -> Result<()> {
        self.queue
            .send(continuation)
            .context("Dispatch queue is closed")
    }

    /// Queue the given source ids in order
    pub fn start(&self, ids: Vec<String>, stage: Stage) -> Result<()> {
        let property_keys: Vec<String> = ids.into_iter().map(|id| id.trim().to_string()).collect();
        info!("📋 Queued {} properties for the {} stage", property_keys.len(), stage);
        self.enqueue(Continuation {
            property_keys,
            stage,
        })
    }

    /// Queue every villa of the source feed, last listed first
    pub async fn start_all(&self, stage: Stage) -> Result<()> {
        let mut ids = self
            .source
            .list_ids()
            .await
            .with_context(|| format!("Failed to list villas from {}", self.source.source_name()))?;
        ids.reverse();
        self.start(ids, stage)
    }

    /// Sync the first pending key, then enqueue the remainder whether or
    /// not that sync succeeded.
    pub async fn continue_pending(&self, continuation: Continuation) -> Result<Progress> {
        let Continuation {
            property_keys,
            stage,
        } = continuation;

        let Some((key, rest)) = property_keys.split_first() else {
            info!("✅ All pending properties processed");
            return Ok(Progress::Complete);
        };

        let succeeded = match self.process(key, stage).await {
            Ok(()) => true,
            Err(e) => {
                error!(%key, %stage, "Failed to sync property: {:#}", e);
                false
            }
        };

        self.enqueue(Continuation {
            property_keys: rest.to_vec(),
            stage,
        })?;

        Ok(Progress::Processed {
            key: key.clone(),
            succeeded,
        })
    }

    async fn process(&self, key: &str, stage: Stage) -> Result<()> {
        let villa = self
            .source
            .villa(key)
            .await
            .with_context(|| format!("Failed to fetch villa {}", key))?;

        match stage {
            Stage::Property => {
                let external_id = self.reconciler.synchronize_property(&villa).await?;
                info!(%key, %external_id, "Property synchronized");
            }
            Stage::Availability => {
                let report = self.reconciler.synchronize_availability(&villa).await;
                if report.failed > 0 {
                    bail!("{} availability operations failed", report.failed);
                }
            }
            Stage::Rates => {
                let report = self.reconciler.synchronize_rates(&villa).await;
                if report.failed > 0 {
                    bail!("{} rate operations failed", report.failed);
                }
            }
        }

        Ok(())
    }

    /// Handle continuations until the queue is drained
    pub async fn run(&self, receiver: &mut mpsc::UnboundedReceiver<Continuation>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        while let Ok(continuation) = receiver.try_recv() {
            match self.continue_pending(continuation).await? {
                Progress::Complete => {}
                Progress::Processed { key, succeeded: true } => summary.succeeded.push(key),
                Progress::Processed { key, succeeded: false } => summary.failed.push(key),
            }
        }

        if !summary.failed.is_empty() {
            warn!("⚠️  {} properties failed: {}", summary.failed.len(), summary.failed.join(", "));
        }
        info!(
            "Run finished: {} synchronized, {} failed",
            summary.succeeded.len(),
            summary.failed.len()
        );

        Ok(summary)
    }
}
