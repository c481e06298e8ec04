use crate::config::cli::Args;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

pub(crate) mod cli;

/// Everything that ties the scraper to one particular site: URL templates,
/// the CSS classes the data lives under, and the pacing/checkpoint knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub fund_url_template: String,
    pub etf_url_template: String,
    pub error_selector: String,
    pub dp_value_selector: String,
    pub screen_reader_selector: String,
    pub render_delay_secs: u64,
    pub checkpoint_every: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            fund_url_template: "https://www.morningstar.com/funds/xnas/{ticker}/portfolio"
                .to_string(),
            etf_url_template: "https://www.morningstar.com/etfs/arcx/{ticker}/portfolio"
                .to_string(),
            error_selector: ".error".to_string(),
            dp_value_selector: ".sal-sustainability__dp-value".to_string(),
            screen_reader_selector: ".sr-only".to_string(),
            render_delay_secs: 2,
            checkpoint_every: 20,
        }
    }
}

pub struct Config {
    pub args: Args,
    pub site: SiteConfig,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        // The site config file is optional; compiled-in defaults cover Morningstar.
        let site = if args.site_config.exists() {
            serde_json::from_str(&std::fs::read_to_string(&args.site_config)?)?
        } else {
            SiteConfig::default()
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            args,
            site,
            http_client,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.backup_dir.exists() {
            std::fs::create_dir_all(&self.args.backup_dir)?;
        }

        info!("Backup dir exists");
        Ok(())
    }
}
