pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::{SlackConfig, TomlConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "every-election")]
#[command(about = "Election API projections and by-election snooper")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 執行一次 LibDemNewbies snooper
    Snoop {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        store_path: Option<String>,

        #[arg(long)]
        slack_webhook: Option<String>,
    },
    /// 從 JSON fixture 輸出 API projection
    Serialize {
        #[arg(long)]
        fixtures: String,

        #[arg(long, conflicts_with = "organisation", required_unless_present = "organisation")]
        election: Option<String>,

        #[arg(long)]
        organisation: Option<String>,

        #[arg(long, requires = "organisation", help = "Emit the organisation as a GeoJSON feature")]
        geo: bool,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取 TOML (若有指定)，再以命令列參數覆寫
    pub fn resolve(&self) -> crate::Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path).map_err(|e| match e {
                crate::ElectionError::IoError(io) => crate::ElectionError::ConfigError {
                    message: format!("cannot read config file '{}': {}", path, io),
                },
                other => other,
            })?,
            None => TomlConfig::default(),
        };

        if let Command::Snoop {
            base_url,
            store_path,
            slack_webhook,
        } = &self.command
        {
            if let Some(base_url) = base_url {
                config.snooper.base_url = base_url.clone();
            }
            if let Some(store_path) = store_path {
                config.store.path = store_path.clone();
            }
            if let Some(webhook_url) = slack_webhook {
                match config.slack.as_mut() {
                    Some(slack) => slack.webhook_url = webhook_url.clone(),
                    None => {
                        config.slack = Some(SlackConfig {
                            webhook_url: webhook_url.clone(),
                            channel: None,
                            username: None,
                            icon_emoji: None,
                        })
                    }
                }
            }
        }

        Ok(config)
    }
}
