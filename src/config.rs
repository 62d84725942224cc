use crate::dispatch::Stage;
use crate::sync::SyncSettings;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "ielv-sync", version, about = "Sync IELV villas into MyVR")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync every villa listed in the IELV feed
    All {
        #[arg(long, value_enum, default_value_t = Stage::Property)]
        stage: Stage,
    },
    /// Sync the given IELV villa ids
    Property {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(long, value_enum, default_value_t = Stage::Property)]
        stage: Stage,
    },
}

/// Process-wide settings, read once at startup
#[derive(Debug, Clone, Args)]
pub struct Config {
    #[arg(long, env = "IELV_BASE_URL")]
    pub ielv_base_url: String,

    #[arg(long, env = "IELV_API_KEY", hide_env_values = true)]
    pub ielv_api_key: Option<String>,

    #[arg(long, env = "MY_VR_BASE_URL", default_value = "https://api.myvr.com/v1")]
    pub myvr_base_url: String,

    #[arg(long, env = "MY_VR_API_KEY", hide_env_values = true)]
    pub myvr_api_key: String,

    #[arg(long = "group-key-1", env = "MY_VR_GROUP_KEY_1")]
    pub group_key_1: Option<String>,

    #[arg(long = "group-key-2", env = "MY_VR_GROUP_KEY_2")]
    pub group_key_2: Option<String>,

    /// Child-resource steps in flight per property (1 = sequential)
    #[arg(long, env = "SYNC_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn group_keys(&self) -> Vec<String> {
        [&self.group_key_1, &self.group_key_2]
            .into_iter()
            .flatten()
            .filter(|key| !key.is_empty())
            .cloned()
            .collect()
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            group_keys: self.group_keys(),
            concurrency: self.concurrency.max(1),
        }
    }
}
