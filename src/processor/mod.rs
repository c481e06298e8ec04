use crate::config::Config;
use crate::dataset::{self, OutputRow};
use crate::error::{EsgError, Result};
use crate::extract::{self, EsgRecord};
use crate::fetcher::{PageFetcher, RawText};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use tracing::{debug, info, warn};

/// How a record that completed without error came out. Distinguishes the
/// benign all-null cases from a genuinely rated fund, so the log can tell
/// "unrated" apart from an extraction bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Parsed,
    Unrated,
    BrokenPage,
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOutcome::Parsed => write!(f, "rated"),
            RecordOutcome::Unrated => write!(f, "unrated fund"),
            RecordOutcome::BrokenPage => write!(f, "page not found"),
        }
    }
}

fn classify(raw: &Option<RawText>, record: &EsgRecord) -> RecordOutcome {
    match (raw, record.sustainability_rating) {
        (None, _) => RecordOutcome::BrokenPage,
        (Some(_), None) => RecordOutcome::Unrated,
        (Some(_), Some(_)) => RecordOutcome::Parsed,
    }
}

pub struct Processor {
    config: Config,
    fetcher: PageFetcher,
}

impl Processor {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = PageFetcher::new(config.http_client.clone(), &config.site)?;

        Ok(Self { config, fetcher })
    }

    pub async fn run(&self) -> Result<()> {
        let args = &self.config.args;

        let mut funds = dataset::read_funds(&args.input)?;
        if let Some(limit) = args.limit {
            funds.truncate(limit);
        }
        info!("Loaded {} funds from {:?}", funds.len(), args.input);

        let checkpoint_path = args.backup_dir.join("fund_tick_checkpoint.csv");
        let checkpoint_every = self.config.site.checkpoint_every.max(1);

        let pb = ProgressBar::new(funds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| EsgError::Other(e.to_string()))?,
        );

        let mut rows: Vec<OutputRow> = Vec::with_capacity(funds.len());
        let mut failures = 0usize;

        for (i, fund) in funds.into_iter().enumerate() {
            let row_no = i + 1;

            if row_no % checkpoint_every == 0 {
                dataset::write_rows(&checkpoint_path, &rows)?;
                debug!("Checkpointed {} rows to {:?}", rows.len(), checkpoint_path);
            }

            let link = dataset::portfolio_url(&self.config.site, &fund);
            pb.set_message(fund.ticker.clone());

            let result = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    pb.finish_and_clear();
                    warn!("Interrupt received, stopping run; latest checkpoint holds {} rows", rows.len());
                    return Ok(());
                }
                result = self.process_fund(&link) => result,
            };

            match result {
                Ok((record, outcome)) => {
                    info!(
                        "Successfully parsed ticker: {}, row: {} ({})",
                        fund.ticker, row_no, outcome
                    );
                    rows.push(OutputRow::new(fund, link, record));
                }
                Err(e) => {
                    failures += 1;
                    warn!("Failed to parse ticker: {}, row: {}: {}", fund.ticker, row_no, e);
                    // Failed funds keep their row; the ESG columns stay empty.
                    rows.push(OutputRow::new(fund, link, EsgRecord::default()));
                }
            }

            pb.inc(1);
        }
        pb.finish_and_clear();

        dataset::write_rows(&args.output, &rows)?;
        info!(
            "Wrote {} rows to {:?} ({} failures)",
            rows.len(),
            args.output,
            failures
        );

        Ok(())
    }

    async fn process_fund(&self, url: &str) -> Result<(EsgRecord, RecordOutcome)> {
        let raw = self.fetcher.fetch(url).await?;
        let record = extract::extract(raw.as_ref())?;
        let outcome = classify(&raw, &record);

        Ok((record, outcome))
    }
}
